//! Image storage for cleaning photos and profile pictures.
//!
//! Uploaded images are sniffed from their header bytes (never from the
//! client-supplied filename), checked against the accepted formats, and
//! written under a category directory with a random file name. The returned
//! relative path is what gets persisted (`cleaning_photos.image_path`,
//! `users.profile_picture_path`).

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

use crate::error::CoreError;

/// Directory (relative to the store root) for cleaning photos.
pub const CATEGORY_CLEANING_PHOTOS: &str = "limpezas_fotos";

/// Directory (relative to the store root) for user profile pictures.
pub const CATEGORY_PROFILE_PICTURES: &str = "profile_pics";

/// An image that has been validated and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Path relative to the store root, using `/` separators.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Persistence backend for uploaded images.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Validate `data` as an image and persist it under `category`.
    async fn store(&self, category: &str, data: &[u8]) -> Result<StoredImage, CoreError>;

    /// Remove a previously stored image. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), CoreError>;
}

/// Map a sniffed format to its stored extension, rejecting anything else.
fn accepted_extension(format: ImageFormat) -> Result<&'static str, CoreError> {
    match format {
        ImageFormat::Png => Ok("png"),
        ImageFormat::Jpeg => Ok("jpg"),
        ImageFormat::WebP => Ok("webp"),
        other => Err(CoreError::Validation(format!(
            "Unsupported image format {other:?}. Accepted: PNG, JPEG, WebP"
        ))),
    }
}

/// Inspect the header of `data`, returning `(extension, width, height)`.
pub fn inspect_image(data: &[u8]) -> Result<(&'static str, u32, u32), CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Image file is empty".into()));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Unreadable image: {e}")))?;

    let format = reader
        .format()
        .ok_or_else(|| CoreError::Validation("File is not a recognised image".into()))?;
    let ext = accepted_extension(format)?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Corrupt image: {e}")))?;

    Ok((ext, width, height))
}

/// Reject paths that could escape the store root.
fn check_relative(path: &str) -> Result<&Path, CoreError> {
    let p = Path::new(path);
    let safe = !path.is_empty()
        && p.components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(p)
    } else {
        Err(CoreError::Validation(format!("Invalid storage path '{path}'")))
    }
}

/// Stores images on the local filesystem below `root`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, category: &str, data: &[u8]) -> Result<StoredImage, CoreError> {
        check_relative(category)?;
        let (ext, width, height) = inspect_image(data)?;

        let dir = self.root.join(category);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create {}: {e}", dir.display())))?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        let full_path = dir.join(&file_name);
        tokio::fs::write(&full_path, data).await.map_err(|e| {
            CoreError::Internal(format!("Failed to write {}: {e}", full_path.display()))
        })?;

        Ok(StoredImage {
            path: format!("{category}/{file_name}"),
            width,
            height,
        })
    }

    async fn remove(&self, path: &str) -> Result<(), CoreError> {
        let relative = check_relative(path)?;
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to remove image '{path}': {e}"
            ))),
        }
    }
}
