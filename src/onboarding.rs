//! Persisted onboarding record: which country the user picked and whether
//! onboarding finished.
//!
//! Stored on the same key-value backend as the completion flags, under keys
//! that never start with the `checkstate_` prefix.

use crate::catalog::{find_country, CountryInfo};
use crate::store::{KeyValueStore, StoreError};
use thiserror::Error;
use tracing::info;

pub const SELECTED_COUNTRY_KEY: &str = "selectedCountryCode";
pub const ONBOARDING_COMPLETE_KEY: &str = "hasCompletedOnboarding";

/// Every key the onboarding record occupies.
pub(crate) const RECORD_KEYS: [&str; 2] = [ONBOARDING_COMPLETE_KEY, SELECTED_COUNTRY_KEY];

/// Errors from onboarding operations.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("Country '{0}' is not supported")]
    UnknownCountry(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The selected country, if one is stored and still supported.
pub fn selected_country<B: KeyValueStore + ?Sized>(store: &B) -> Option<CountryInfo> {
    store
        .get_string(SELECTED_COUNTRY_KEY)
        .and_then(|code| find_country(&code))
}

/// True only when the completion flag is set and a supported country is
/// selected.
pub fn has_completed_onboarding<B: KeyValueStore + ?Sized>(store: &B) -> bool {
    store.get_bool(ONBOARDING_COMPLETE_KEY).unwrap_or(false) && selected_country(store).is_some()
}

/// Store the selected country and mark onboarding complete.
pub fn select_country<B: KeyValueStore + ?Sized>(
    store: &mut B,
    country_code: &str,
) -> Result<CountryInfo, OnboardingError> {
    let country = find_country(country_code)
        .ok_or_else(|| OnboardingError::UnknownCountry(country_code.to_string()))?;

    store.set_string(SELECTED_COUNTRY_KEY, &country.code)?;
    store.set_bool(ONBOARDING_COMPLETE_KEY, true)?;
    info!(country = %country.code, "onboarding completed");
    Ok(country)
}

/// Forget the selected country and the completion flag.
pub fn reset_onboarding<B: KeyValueStore + ?Sized>(store: &mut B) -> Result<(), StoreError> {
    let keys: Vec<String> = RECORD_KEYS.iter().map(|key| key.to_string()).collect();
    store.remove_keys(&keys)?;
    info!("onboarding reset");
    Ok(())
}
