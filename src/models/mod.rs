use serde::{Deserialize, Serialize};

/// Transaction mode for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sale,
    Rent,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Sale, Mode::Rent];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Sale => "sale",
            Mode::Rent => "rent",
        }
    }

    /// OLX category path segment for this mode
    pub fn category_slug(self) -> &'static str {
        match self {
            Mode::Sale => "dijual-rumah-apartemen_c5158",
            Mode::Rent => "disewakan-rumah-apartemen_c5160",
        }
    }
}

/// One scraped property listing, keyed by its OLX URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub url: String,
    pub price_text: String,
    pub price_numeric: Option<i64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub building_area_m2: Option<i32>,
    pub location: String,
    pub posting_date: String,
    pub image_url: String,
    pub mode: Mode,
    pub region_slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Sale).unwrap(), "\"sale\"");
        assert_eq!(serde_json::to_string(&Mode::Rent).unwrap(), "\"rent\"");
    }

    #[test]
    fn record_uses_snake_case_field_names() {
        let record = ListingRecord {
            title: "Rumah 2 lantai".to_string(),
            url: "https://www.olx.co.id/item/rumah-iid-123".to_string(),
            price_text: "Rp 1.500.000".to_string(),
            price_numeric: Some(1_500_000),
            bedrooms: Some(3),
            bathrooms: Some(2),
            building_area_m2: Some(90),
            location: "Jakarta Selatan".to_string(),
            posting_date: "01/08/2026".to_string(),
            image_url: String::new(),
            mode: Mode::Sale,
            region_slug: "jakarta-selatan".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["price_text"], "Rp 1.500.000");
        assert_eq!(value["building_area_m2"], 90);
        assert_eq!(value["mode"], "sale");
        assert_eq!(value["region_slug"], "jakarta-selatan");
    }
}
