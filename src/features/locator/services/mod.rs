mod geocoding_service;
mod locator_service;
mod map_service;
mod metadata_service;
mod upload_service;

pub use geocoding_service::{NominatimGeocoder, ReverseGeocoder};
pub use locator_service::{LocatedPhoto, LocatorService};
pub use map_service::MapService;
pub use metadata_service::MetadataService;
pub use upload_service::UploadService;
