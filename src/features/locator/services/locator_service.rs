use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::locator::models::{
    GpsCoordinate, MapArtifact, ResolvedAddress, UploadedImage,
};
use crate::features::locator::services::{
    MapService, MetadataService, ReverseGeocoder, UploadService,
};

/// Everything the result page shows about a located photo
#[derive(Debug, Clone)]
pub struct LocatedPhoto {
    pub coordinate: GpsCoordinate,
    pub address: ResolvedAddress,
    pub captured_at: Option<String>,
    pub map: MapArtifact,
}

/// Runs one upload through save → extract → geocode → render
pub struct LocatorService {
    uploads: UploadService,
    metadata: MetadataService,
    geocoder: Arc<dyn ReverseGeocoder>,
    maps: MapService,
}

impl LocatorService {
    pub fn new(
        uploads: UploadService,
        metadata: MetadataService,
        geocoder: Arc<dyn ReverseGeocoder>,
        maps: MapService,
    ) -> Self {
        Self {
            uploads,
            metadata,
            geocoder,
            maps,
        }
    }

    /// Locate a photo and render its map.
    ///
    /// The upload is released on every path except a geocoding failure,
    /// where it is kept on disk.
    pub async fn locate(&self, image: UploadedImage) -> Result<LocatedPhoto> {
        let upload = self.uploads.store(image).await?;

        let metadata = match self.metadata.extract(upload.path()).await {
            Ok(metadata) => metadata,
            Err(e) => {
                upload.release().await;
                return Err(e);
            }
        };

        let Some(coordinate) = metadata.coordinate else {
            info!("No GPS location in {}", upload.path().display());
            upload.release().await;
            return Err(AppError::NoLocation);
        };

        let components = match self.geocoder.reverse(coordinate).await {
            Ok(components) => components,
            Err(e) => {
                upload.retain("reverse geocoding failed");
                return Err(match e {
                    AppError::Geocoding(_) => e,
                    other => AppError::Geocoding(other.to_string()),
                });
            }
        };

        let address = ResolvedAddress::from_components(&components);
        let map = self.maps.create(coordinate, &address).await;
        upload.release().await;
        let map = map?;

        info!(
            "Photo located at {}: {}, {}, {} (map {})",
            coordinate.display(),
            address.street,
            address.city,
            address.country,
            map.path.display()
        );

        Ok(LocatedPhoto {
            coordinate,
            address,
            captured_at: metadata.captured_at,
            map,
        })
    }

    /// Stored map document by id
    pub async fn map_document(&self, id: &str) -> Result<String> {
        self.maps.load(id).await
    }
}
