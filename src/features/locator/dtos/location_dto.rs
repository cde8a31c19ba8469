use serde::Serialize;

use crate::features::locator::services::LocatedPhoto;

/// Context for the `map.html` result page
#[derive(Debug, Serialize)]
pub struct LocationPageDto {
    pub street: String,
    pub city: String,
    pub country: String,
    /// `"lat, lon"` with 6 decimals
    pub coordinates: String,
    /// Capture timestamp, omitted from the page when absent
    pub datetime: Option<String>,
    pub map_url: String,
}

impl From<LocatedPhoto> for LocationPageDto {
    fn from(located: LocatedPhoto) -> Self {
        Self {
            map_url: located.map.url(),
            street: located.address.street,
            city: located.address.city,
            country: located.address.country,
            coordinates: located.coordinate.display(),
            datetime: located.captured_at,
        }
    }
}
