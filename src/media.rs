//! Local media attachments and their preview handles
//!
//! An attachment lives only on the client until the composer uploads it.
//! While it is attached, the UI shows it through a `blob:` preview URL
//! registered in a [`PreviewRegistry`]. The URL is revoked as soon as the
//! attachment is dropped, whether it was removed, replaced or submitted.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of media, used to pick the preview element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image (JPEG, PNG, GIF, WebP)
    Image,
    /// Video (MP4, WebM, MOV)
    Video,
    /// Anything else
    Other,
}

/// Registry of live preview URLs
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new preview URL
    pub fn create(&self) -> PreviewHandle {
        let url = format!("blob:balze/{}", Uuid::new_v4());
        self.lock().insert(url.clone());
        tracing::debug!(%url, "Created media preview");

        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    /// Whether a preview URL is still live
    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of live preview URLs
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url) {
            tracing::debug!(%url, "Revoked media preview");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live preview URL, revoked on drop
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// The preview URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

/// A file picked by the user, not yet uploaded
#[derive(Debug)]
pub struct MediaAttachment {
    file_name: String,
    bytes: Vec<u8>,
    content_type: String,
    preview: PreviewHandle,
}

impl MediaAttachment {
    /// Wrap in-memory file contents
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, previews: &PreviewRegistry) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();

        Self {
            file_name,
            bytes,
            content_type,
            preview: previews.create(),
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: &Path, previews: &PreviewRegistry) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .context("Media path has no file name")?;

        Ok(Self::new(file_name, bytes, previews))
    }

    /// Original file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type guessed from the extension
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Image, video or other
    pub fn kind(&self) -> MediaKind {
        if self.content_type.starts_with("video/") {
            MediaKind::Video
        } else if self.content_type.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Other
        }
    }

    /// Local preview URL
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }

    /// Extension used for the storage key
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    /// File contents, for upload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Storage key for an upload: `<user_id>/<unix_millis>.<ext>`
pub fn storage_key(user_id: Uuid, at: DateTime<Utc>, extension: &str) -> String {
    format!("{}/{}.{}", user_id, at.timestamp_millis(), extension)
}

/// Text after the last `.`; a name without a dot is its own extension
fn file_extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

/// Guess a MIME type from a file name
fn content_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_key() {
        let user = Uuid::new_v4();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            storage_key(user, at, "png"),
            format!("{user}/1700000000123.png")
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(file_extension("holiday.photo.JPG"), "JPG");
        assert_eq!(file_extension("README"), "README");
    }

    #[test]
    fn test_kind_from_name() {
        let previews = PreviewRegistry::new();
        assert_eq!(
            MediaAttachment::new("clip.MP4", vec![1], &previews).kind(),
            MediaKind::Video
        );
        assert_eq!(
            MediaAttachment::new("cat.webp", vec![1], &previews).kind(),
            MediaKind::Image
        );
        assert_eq!(
            MediaAttachment::new("notes", vec![], &previews).kind(),
            MediaKind::Other
        );
    }

    #[test]
    fn test_preview_revoked_on_drop() {
        let previews = PreviewRegistry::new();
        let attachment = MediaAttachment::new("a.png", vec![0; 4], &previews);
        let url = attachment.preview_url().to_string();
        assert!(url.starts_with("blob:balze/"));
        assert!(previews.is_live(&url));

        drop(attachment);
        assert!(!previews.is_live(&url));
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let previews = PreviewRegistry::new();
        let attachment =
            tokio_test::block_on(MediaAttachment::from_path(&path, &previews)).unwrap();
        assert_eq!(attachment.file_name(), "pic.gif");
        assert_eq!(attachment.content_type(), "image/gif");
        assert_eq!(attachment.len(), 6);
    }
}
