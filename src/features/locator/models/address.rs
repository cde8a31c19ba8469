use std::collections::HashMap;

use crate::shared::constants::UNKNOWN;

/// Raw address components as returned by the geocoder, keyed by field name
pub type AddressComponents = HashMap<String, String>;

/// Nominatim keys tried in order for each resolved field
const CITY_KEYS: &[&str] = &["city", "town", "village", "municipality"];
const COUNTRY_KEYS: &[&str] = &["country"];
const STREET_KEYS: &[&str] = &["road", "pedestrian", "street", "footway", "path"];

/// Street, city and country shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub street: String,
    pub city: String,
    pub country: String,
}

impl ResolvedAddress {
    pub fn from_components(components: &AddressComponents) -> Self {
        Self {
            street: first_present(components, STREET_KEYS),
            city: first_present(components, CITY_KEYS),
            country: first_present(components, COUNTRY_KEYS),
        }
    }
}

/// First non-empty value among `keys`, or the unknown placeholder
fn first_present(components: &AddressComponents, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| components.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
