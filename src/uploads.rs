//! Product image storage
//!
//! Uploaded images are validated by content (not filename), then written
//! under the upload directory as `<sha256>.<ext>`. Content-addressed names
//! make re-uploads of the same file idempotent. The directory itself is
//! served statically under `/uploads`.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// URL prefix under which images are served
const URL_PREFIX: &str = "/uploads/";

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Disk-backed image store
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the store, making sure the directory exists
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the images live in (for static serving)
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an uploaded image, returning its public URL
    pub fn save(&self, data: &[u8]) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::Validation("Empty file".to_string()));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(format!(
                "File too large: {} bytes (max {MAX_FILE_SIZE})",
                data.len()
            )));
        }

        let format = image::guess_format(data)
            .map_err(|_| AppError::Validation("Unrecognized image format".to_string()))?;
        let ext = match format {
            image::ImageFormat::Png => "png",
            image::ImageFormat::Jpeg => "jpg",
            image::ImageFormat::WebP => "webp",
            other => {
                return Err(AppError::Validation(format!(
                    "Unsupported image format: {other:?}"
                )));
            }
        };

        let filename = format!("{}.{ext}", calculate_hash(data));
        let path = self.dir.join(&filename);
        if !path.exists() {
            fs::write(&path, data)
                .map_err(|e| AppError::Internal(format!("Failed to write image: {e}")))?;
        }

        Ok(format!("{URL_PREFIX}{filename}"))
    }

    /// Remove a stored image by its public URL
    ///
    /// Ignores URLs outside the upload prefix and files that are already
    /// gone, so deleting a product with an external or missing image is
    /// never an error.
    pub fn delete(&self, image_url: &str) {
        let Some(filename) = image_url.strip_prefix(URL_PREFIX) else {
            return;
        };
        if filename.contains('/') || filename.contains("..") {
            return;
        }
        let path = self.dir.join(filename);
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), "Failed to delete image: {e}");
        }
    }
}
