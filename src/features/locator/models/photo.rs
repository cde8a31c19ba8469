use std::path::PathBuf;
use uuid::Uuid;

use super::coordinate::GpsCoordinate;

/// Photo as received from the upload form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// What the metadata extractor found in a photo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoMetadata {
    pub coordinate: Option<GpsCoordinate>,
    /// Verbatim EXIF timestamp, e.g. `2023:05:01 14:22:10`
    pub captured_at: Option<String>,
}

/// A rendered map document on disk
#[derive(Debug, Clone)]
pub struct MapArtifact {
    pub id: Uuid,
    pub path: PathBuf,
}

impl MapArtifact {
    /// Route the document is served from
    pub fn url(&self) -> String {
        format!("/maps/{}", self.id)
    }
}
