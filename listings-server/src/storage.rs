//! Local media storage
//!
//! Uploaded files live under `MEDIA_DIR`, content-addressed:
//! images are validated, re-encoded as JPEG and stored at
//! `{category}/{sha256}.jpg`; daily-menu PDFs are kept as-is at
//! `{category}/{sha256}.pdf`. Writing the same content twice is a no-op.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};

/// Maximum upload size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// JPEG quality for venue photos
const JPEG_QUALITY: u8 = 85;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Top-level media folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Venues,
    Gallery,
    Awards,
    Beaches,
    Menus,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Venues => "venues",
            MediaCategory::Gallery => "gallery",
            MediaCategory::Awards => "awards",
            MediaCategory::Beaches => "beaches",
            MediaCategory::Menus => "menus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "venues" => Some(MediaCategory::Venues),
            "gallery" => Some(MediaCategory::Gallery),
            "awards" => Some(MediaCategory::Awards),
            "beaches" => Some(MediaCategory::Beaches),
            "menus" => Some(MediaCategory::Menus),
            _ => None,
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    /// Key relative to the media root (what gets stored in the database)
    pub key: String,
    /// Public URL
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Validate, re-encode as JPEG and store an image
    pub async fn store_image(
        &self,
        category: MediaCategory,
        data: Vec<u8>,
        filename: &str,
    ) -> AppResult<StoredFile> {
        let ext = file_extension(filename)?;
        check_size(&data)?;
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!(
                    "Unsupported file format '{}'. Supported: {}",
                    ext,
                    SUPPORTED_FORMATS.join(", ")
                ),
            ));
        }

        let compressed = tokio::task::spawn_blocking(move || compress_to_jpeg(&data))
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::ImageProcessingFailed,
                    format!("Image task failed: {e}"),
                )
            })??;

        let key = format!("{}/{}.jpg", category.as_str(), calculate_hash(&compressed));
        self.write_if_absent(&key, &compressed).await?;

        tracing::info!(
            original_name = %filename,
            key = %key,
            size = compressed.len(),
            "Image stored"
        );

        Ok(StoredFile {
            url: self.url_for(&key),
            key,
            size: compressed.len(),
            content_type: "image/jpeg".to_string(),
        })
    }

    /// Store a daily menu: PDFs as-is, anything else through [`store_image`](Self::store_image)
    pub async fn store_document(
        &self,
        category: MediaCategory,
        data: Vec<u8>,
        filename: &str,
    ) -> AppResult<StoredFile> {
        if !data.starts_with(PDF_MAGIC) {
            return self.store_image(category, data, filename).await;
        }

        check_size(&data)?;
        let key = format!("{}/{}.pdf", category.as_str(), calculate_hash(&data));
        self.write_if_absent(&key, &data).await?;

        tracing::info!(original_name = %filename, key = %key, size = data.len(), "PDF stored");

        Ok(StoredFile {
            url: self.url_for(&key),
            key,
            size: data.len(),
            content_type: "application/pdf".to_string(),
        })
    }

    /// Best-effort delete; failures are logged
    pub async fn remove(&self, key: &str) {
        let path = match self.resolve(key) {
            Ok(p) => p,
            Err(_) => {
                tracing::warn!(key = %key, "Refusing to remove invalid media key");
                return;
            }
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(key = %key, "Media file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to remove media file"),
        }
    }

    /// Read a stored file; returns the bytes and a guessed content type
    pub async fn open(&self, key: &str) -> AppResult<(Vec<u8>, String)> {
        let path = self.resolve(key)?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found("File")
            } else {
                tracing::error!(key = %key, error = %e, "Failed to read media file");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        })?;
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok((bytes, mime))
    }

    /// Map a key onto the media root, rejecting anything that could escape it
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let invalid = || AppError::invalid_request("Invalid media key");
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(invalid());
        }
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid());
        }
        Ok(self.root.join(key))
    }

    async fn write_if_absent(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.resolve(key)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(key = %key, "Duplicate upload, reusing existing file");
            return Ok(());
        }
        let storage_err = |e: std::io::Error| {
            tracing::error!(key = %key, error = %e, "Failed to write media file");
            AppError::new(ErrorCode::FileStorageFailed)
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(storage_err)
    }
}

fn file_extension(filename: &str) -> AppResult<String> {
    if filename.trim().is_empty() {
        return Err(AppError::new(ErrorCode::NoFilename));
    }
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("Invalid file extension for: {filename}"),
            )
        })
}

fn check_size(data: &[u8]) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }
    Ok(())
}

fn compress_to_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Image compression failed: {e}"),
            )
        })?;
    }
    Ok(buffer)
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:8080/media/")
    }

    #[tokio::test]
    async fn test_store_image_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let first = storage
            .store_image(MediaCategory::Venues, png_bytes(), "terrace.PNG")
            .await
            .unwrap();
        assert!(first.key.starts_with("venues/"));
        assert!(first.key.ends_with(".jpg"));
        assert_eq!(first.content_type, "image/jpeg");
        assert_eq!(first.url, format!("http://localhost:8080/media/{}", first.key));
        assert!(dir.path().join(&first.key).exists());

        let second = storage
            .store_image(MediaCategory::Venues, png_bytes(), "copy.png")
            .await
            .unwrap();
        assert_eq!(first.key, second.key);
    }

    #[tokio::test]
    async fn test_store_image_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage
            .store_image(MediaCategory::Venues, png_bytes(), "menu.gif")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = storage
            .store_image(MediaCategory::Venues, b"not an image".to_vec(), "fake.jpg")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);

        let err = storage
            .store_image(MediaCategory::Venues, Vec::new(), "empty.jpg")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let err = storage
            .store_image(MediaCategory::Venues, vec![0; MAX_FILE_SIZE + 1], "big.jpg")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[tokio::test]
    async fn test_store_document_keeps_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let pdf = b"%PDF-1.4\n% menu del dia\n".to_vec();

        let stored = storage
            .store_document(MediaCategory::Menus, pdf.clone(), "menu.pdf")
            .await
            .unwrap();
        assert!(stored.key.starts_with("menus/"));
        assert!(stored.key.ends_with(".pdf"));
        assert_eq!(stored.content_type, "application/pdf");

        let (bytes, mime) = storage.open(&stored.key).await.unwrap();
        assert_eq!(bytes, pdf);
        assert_eq!(mime, "application/pdf");

        let image = storage
            .store_document(MediaCategory::Menus, png_bytes(), "menu.png")
            .await
            .unwrap();
        assert!(image.key.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_open_and_remove_reject_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        for key in ["../secret", "/etc/passwd", "venues/../../x", "a\\b", "venues//x.jpg", ""] {
            let err = storage.open(key).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest, "key = {key:?}");
        }
        // no panic, nothing removed
        storage.remove("../secret").await;

        let err = storage.open("venues/missing.jpg").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let stored = storage
            .store_image(MediaCategory::Gallery, png_bytes(), "a.png")
            .await
            .unwrap();
        storage.remove(&stored.key).await;
        assert!(!dir.path().join(&stored.key).exists());
        // removing twice is fine
        storage.remove(&stored.key).await;
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(MediaCategory::parse("Beaches"), Some(MediaCategory::Beaches));
        assert_eq!(MediaCategory::parse("invoices"), None);
    }
}
