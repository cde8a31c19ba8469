use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::error::{AppError, Result};
use crate::features::locator::models::{dms_to_decimal, GpsCoordinate, PhotoMetadata};

#[derive(Debug, Error)]
enum MetadataError {
    #[error("failed to open image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse EXIF: {0}")]
    Exif(#[from] exif::Error),
}

/// Reads GPS position and capture time from image EXIF
#[derive(Default)]
pub struct MetadataService;

impl MetadataService {
    pub fn new() -> Self {
        Self
    }

    /// Extract metadata on the blocking pool.
    ///
    /// Missing or unreadable metadata is not an error; it yields an empty
    /// [`PhotoMetadata`].
    pub async fn extract(&self, path: &Path) -> Result<PhotoMetadata> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_photo_metadata(&path))
            .await
            .map_err(|e| AppError::Internal(format!("Metadata task failed: {}", e)))
    }
}

/// Parse a photo's EXIF block into [`PhotoMetadata`]
pub fn read_photo_metadata(path: &Path) -> PhotoMetadata {
    match read_exif(path) {
        Ok(exif) => metadata_from_exif(&exif),
        Err(MetadataError::Exif(exif::Error::NotFound(_))) => {
            debug!("No EXIF data in {}", path.display());
            PhotoMetadata::default()
        }
        Err(e) => {
            warn!("EXIF read error for {}: {}", path.display(), e);
            PhotoMetadata::default()
        }
    }
}

fn read_exif(path: &Path) -> std::result::Result<Exif, MetadataError> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(&file);
    Ok(Reader::new().read_from_container(&mut bufreader)?)
}

fn metadata_from_exif(exif: &Exif) -> PhotoMetadata {
    let captured_at =
        ascii_field(exif, Tag::DateTimeOriginal).or_else(|| ascii_field(exif, Tag::DateTime));

    PhotoMetadata {
        coordinate: gps_coordinate(exif),
        captured_at,
    }
}

fn gps_coordinate(exif: &Exif) -> Option<GpsCoordinate> {
    let lat = exif.get_field(Tag::GPSLatitude, In::PRIMARY)?;
    let lat_ref = ascii_field(exif, Tag::GPSLatitudeRef)?;
    let lon = exif.get_field(Tag::GPSLongitude, In::PRIMARY)?;
    let lon_ref = ascii_field(exif, Tag::GPSLongitudeRef)?;

    let (Value::Rational(lat_dms), Value::Rational(lon_dms)) = (&lat.value, &lon.value) else {
        debug!("GPS tags present but not rational");
        return None;
    };

    match (
        dms_to_decimal(lat_dms, &lat_ref),
        dms_to_decimal(lon_dms, &lon_ref),
    ) {
        (Some(lat), Some(lon)) => Some(GpsCoordinate::new(lat, lon)),
        _ => {
            debug!("GPS tags present but could not be converted");
            None
        }
    }
}

/// First string of an ASCII field, without trailing NULs
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref vec) = field.value {
        let text = String::from_utf8_lossy(vec.first()?)
            .trim_end_matches('\0')
            .to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}
