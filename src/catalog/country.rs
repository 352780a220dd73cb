//! Supported destination countries.

use serde::{Deserialize, Serialize};

/// A destination the app ships a checklist for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub code: String,
    pub title: String,
    pub description: String,
    /// Fallback location label when no device location is known
    pub location_tag: String,
}

/// Every supported country, in display order.
pub fn available_countries() -> Vec<CountryInfo> {
    vec![
        CountryInfo {
            code: "IT".to_string(),
            title: "ITALY".to_string(),
            description: "Italy is known for its crystal-clear waters, elegant villas, and \
                serene landscapes, offering the perfect mix of beauty and relaxation."
                .to_string(),
            location_tag: "Rome, Italy".to_string(),
        },
        CountryInfo {
            code: "MX".to_string(),
            title: "MEXICO".to_string(),
            description: "Mexico blends vibrant culture, stunning beaches, and rich history \
                from ancient ruins to lively cities offering unforgettable adventures."
                .to_string(),
            location_tag: "Mexico City, Mexico".to_string(),
        },
    ]
}

/// Look up a supported country by code.
pub fn find_country(code: &str) -> Option<CountryInfo> {
    available_countries()
        .into_iter()
        .find(|country| country.code == code)
}
