pub mod address;
pub mod coordinate;
pub mod photo;

pub use address::{AddressComponents, ResolvedAddress};
pub use coordinate::{dms_to_decimal, GpsCoordinate};
pub use photo::{MapArtifact, PhotoMetadata, UploadedImage};
