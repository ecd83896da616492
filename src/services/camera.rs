// src/services/camera.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use crate::models::CapturedImage;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    Denied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("capture cancelled by user")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device camera. One call takes exactly one still photo.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn take_photo(&self) -> Result<CapturedImage, CameraError>;
}

/// "Camera" for hosts without one: every capture returns the contents of
/// a configured image file as a data url.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: Option<PathBuf>,
}

impl FileCamera {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn take_photo(&self) -> Result<CapturedImage, CameraError> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| CameraError::Unavailable("no image source configured".to_string()))?;

        let mime = mime_for_path(path).ok_or_else(|| {
            CameraError::Unavailable(format!("unsupported image file: {}", path.display()))
        })?;

        let bytes = tokio::fs::read(path).await?;
        debug!("Captured {} bytes from {}", bytes.len(), path.display());
        Ok(CapturedImage::from_bytes(&mime, &bytes))
    }
}

fn mime_for_path(path: &Path) -> Option<mime::Mime> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "png" => Some(mime::IMAGE_PNG),
        "gif" => Some(mime::IMAGE_GIF),
        "webp" => "image/webp".parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_camera_is_unavailable() {
        let camera = FileCamera::new(None);
        assert!(matches!(
            camera.take_photo().await,
            Err(CameraError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn captures_file_as_data_url() {
        let path = std::env::temp_dir().join(format!("posts-feed-{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let image = FileCamera::new(Some(path.clone())).take_photo().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(image.data_url, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("posts-feed-{}.jpg", uuid::Uuid::new_v4()));
        let camera = FileCamera::new(Some(path));
        assert!(matches!(camera.take_photo().await, Err(CameraError::Io(_))));
    }

    #[test]
    fn maps_extensions_case_insensitively() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), Some(mime::IMAGE_JPEG));
        assert_eq!(
            mime_for_path(Path::new("a.webp")).map(|m| m.essence_str().to_string()),
            Some("image/webp".to_string())
        );
        assert_eq!(mime_for_path(Path::new("a.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }
}
