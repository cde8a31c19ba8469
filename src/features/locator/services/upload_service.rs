use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result, UploadRejection};
use crate::features::locator::models::UploadedImage;
use crate::shared::constants::ALLOWED_EXTENSIONS;

/// Check a client-supplied file name before anything is written
pub fn validate_file_name(file_name: &str) -> std::result::Result<(), UploadRejection> {
    if file_name.is_empty() {
        return Err(UploadRejection::EmptyFilename);
    }

    match file_name.rsplit_once('.') {
        Some((_, ext)) if ALLOWED_EXTENSIONS.contains(ext.to_lowercase().as_str()) => Ok(()),
        _ => Err(UploadRejection::UnsupportedFormat),
    }
}

/// Last path component of a client-supplied name, so uploads stay inside the upload dir
fn storage_name(file_name: &str) -> &str {
    file_name.rsplit(['/', '\\']).next().unwrap_or(file_name)
}

/// An upload written to disk. Call [`StoredUpload::release`] once processing is done.
#[derive(Debug)]
#[must_use = "stored uploads must be released or explicitly retained"]
pub struct StoredUpload {
    path: PathBuf,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort removal. Failures are logged and never surfaced.
    pub async fn release(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed upload {}", self.path.display()),
            Err(e) => warn!("Could not remove upload {}: {}", self.path.display(), e),
        }
    }

    /// Leave the file on disk
    pub fn retain(self, reason: &str) {
        warn!("Upload {} left on disk: {}", self.path.display(), reason);
    }
}

/// Writes uploads into the working directory
pub struct UploadService {
    upload_dir: PathBuf,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Validate and persist an upload under its original file name.
    ///
    /// A prior file with the same name is overwritten.
    pub async fn store(&self, image: UploadedImage) -> Result<StoredUpload> {
        validate_file_name(&image.file_name).map_err(AppError::InvalidUpload)?;

        let name = storage_name(&image.file_name);
        if name.is_empty() || name == "." || name == ".." {
            return Err(AppError::InvalidUpload(UploadRejection::EmptyFilename));
        }

        let path = self.upload_dir.join(name);
        tokio::fs::write(&path, &image.data)
            .await
            .map_err(AppError::SaveFailed)?;

        info!(
            "Upload saved: path={}, size={}",
            path.display(),
            image.data.len()
        );

        Ok(StoredUpload { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use tokio_test::{assert_err, assert_ok};

    fn image(name: &str) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            data: b"not really an image".to_vec(),
        }
    }

    #[test]
    fn test_validate_allowed_extensions_case_insensitive() {
        for name in ["a.png", "b.JPG", "c.JpEg", "d.gif", "e.bmp", "f.TIFF", "x.y.jpg"] {
            assert_ok!(validate_file_name(name));
        }
    }

    #[test]
    fn test_validate_rejects_other_names() {
        assert_eq!(validate_file_name(""), Err(UploadRejection::EmptyFilename));
        for name in ["photo", "photo.", "photo.webp", "photo.jpg.exe", "jpg"] {
            assert_eq!(
                validate_file_name(name),
                Err(UploadRejection::UnsupportedFormat),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_validate_rejects_random_names_without_dot() {
        for _ in 0..32 {
            let name: String = (1..16).fake::<String>().replace('.', "");
            if name.is_empty() {
                continue;
            }
            assert_err!(validate_file_name(&name));
        }
    }

    #[test]
    fn test_storage_name_strips_directories() {
        assert_eq!(storage_name("../../etc/passwd.jpg"), "passwd.jpg");
        assert_eq!(storage_name("C:\\Users\\me\\IMG_1.JPG"), "IMG_1.JPG");
        assert_eq!(storage_name("plain.png"), "plain.png");
    }

    #[tokio::test]
    async fn test_store_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path());

        let first = service.store(image("photo.jpg")).await.unwrap();
        let mut second_image = image("photo.jpg");
        second_image.data = Faker.fake::<Vec<u8>>();
        let second = service.store(second_image.clone()).await.unwrap();

        assert_eq!(first.path(), second.path());
        assert_eq!(std::fs::read(second.path()).unwrap(), second_image.data);
        second.release().await;
        first.retain("test");
    }

    #[tokio::test]
    async fn test_store_stays_inside_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path());

        let stored = service.store(image("../escape.png")).await.unwrap();
        assert_eq!(stored.path(), dir.path().join("escape.png"));
        stored.release().await;
    }

    #[tokio::test]
    async fn test_store_reports_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path().join("missing"));

        let result = service.store(image("photo.jpg")).await;
        assert!(matches!(result, Err(AppError::SaveFailed(_))));
    }

    #[tokio::test]
    async fn test_release_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path());

        let stored = service.store(image("photo.gif")).await.unwrap();
        let path = stored.path().to_path_buf();
        std::fs::remove_file(&path).unwrap();
        stored.release().await;
        assert!(!path.exists());
    }
}
