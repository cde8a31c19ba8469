use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::Html,
};
use minijinja::context;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, UploadRejection};
use crate::features::locator::dtos::LocationPageDto;
use crate::features::locator::models::UploadedImage;
use crate::features::locator::services::LocatorService;
use crate::shared::constants::PHOTO_FIELD;
use crate::shared::templates::render_template;

/// Upload form
pub async fn index() -> Result<Html<String>, AppError> {
    Ok(Html(render_template("index.html", context! {})?))
}

/// Locate an uploaded photo
///
/// Accepts multipart/form-data with a `photo` file field and responds with
/// either the map page or the form annotated with an error.
pub async fn upload_photo(
    State(service): State<Arc<LocatorService>>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let image = read_photo_field(&mut multipart).await?;
    debug!(
        "Received photo: name={}, size={}",
        image.file_name,
        image.data.len()
    );

    let located = service.locate(image).await?;
    let page = render_template("map.html", LocationPageDto::from(located))?;

    Ok(Html(page))
}

/// Serve a rendered map document
pub async fn show_map(
    State(service): State<Arc<LocatorService>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    Ok(Html(service.map_document(&id).await?))
}

/// First `photo` field that carries a file name
async fn read_photo_field(multipart: &mut Multipart) -> Result<UploadedImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        rejection_for(&e)
    })? {
        if field.name() != Some(PHOTO_FIELD) {
            debug!("Ignoring field: {:?}", field.name());
            continue;
        }

        // A `photo` field without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            rejection_for(&e)
        })?;

        return Ok(UploadedImage {
            file_name,
            data: data.to_vec(),
        });
    }

    Err(AppError::InvalidUpload(UploadRejection::MissingFile))
}

/// Body limit overruns are reported as such; any other broken body means no file arrived
fn rejection_for(error: &MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InvalidUpload(UploadRejection::TooLarge)
    } else {
        AppError::InvalidUpload(UploadRejection::MissingFile)
    }
}
