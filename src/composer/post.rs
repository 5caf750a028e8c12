//! Composer for new posts with an optional media attachment

use std::path::Path;

use anyhow::Result as AnyResult;
use chrono::Utc;
use uuid::Uuid;

use crate::api::Backend;
use crate::error::PostError;
use crate::media::{MediaAttachment, PreviewRegistry, storage_key};
use crate::models::{NewPost, Post};
use crate::validation::{ContentRules, Target};

use super::{BusyFlag, OnCreated, Toast, notify_mentions};

/// Toast shown after a post is created
pub const POST_CREATED: &str = "Post created successfully!";

/// Generic failure message for the post composer
pub const POST_FAILED: &str = "Failed to create post";

/// State of the "create post" dialog
pub struct PostComposer {
    user_id: Uuid,
    rules: ContentRules,
    previews: PreviewRegistry,
    content: String,
    media: Option<MediaAttachment>,
    open: bool,
    busy: BusyFlag,
    on_created: Option<OnCreated>,
}

impl PostComposer {
    /// Create a closed, empty composer for `user_id`
    pub fn new(user_id: Uuid, previews: PreviewRegistry) -> Self {
        Self {
            user_id,
            rules: ContentRules::default(),
            previews,
            content: String::new(),
            media: None,
            open: false,
            busy: BusyFlag::default(),
            on_created: None,
        }
    }

    /// Use custom content rules
    pub fn with_rules(mut self, rules: ContentRules) -> Self {
        self.rules = rules;
        self
    }

    /// Callback fired after each successful submission
    pub fn on_post_created(mut self, callback: impl FnMut(&Post) + Send + 'static) -> Self {
        self.on_created = Some(Box::new(callback));
        self
    }

    /// Open the dialog
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the dialog (the draft is kept)
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether the dialog is open
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Replace the draft text
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Draft text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Attach media, releasing any previous attachment
    pub fn attach_media(&mut self, media: MediaAttachment) {
        tracing::debug!(file = media.file_name(), size = media.len(), "Attached media");
        self.media = Some(media);
    }

    /// Read a file from disk and attach it
    pub async fn attach_file(&mut self, path: &Path) -> AnyResult<()> {
        let media = MediaAttachment::from_path(path, &self.previews).await?;
        self.attach_media(media);
        Ok(())
    }

    /// Remove the attachment and release its preview
    pub fn remove_media(&mut self) {
        self.media = None;
    }

    /// Current attachment
    pub const fn media(&self) -> Option<&MediaAttachment> {
        self.media.as_ref()
    }

    /// Preview URL of the current attachment
    pub fn preview_url(&self) -> Option<&str> {
        self.media.as_ref().map(MediaAttachment::preview_url)
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.busy.is_set()
    }

    /// Handle for render loops that need to watch the in-flight state
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Toast for a submission result
    pub fn toast(result: &Result<Post, PostError>) -> Toast {
        Toast::from_result(result, POST_CREATED, POST_FAILED)
    }

    /// Validate, upload, insert and notify
    ///
    /// On success the form is reset, the dialog closes and the completion
    /// callback fires. On failure the form is left untouched.
    pub async fn submit<B: Backend>(&mut self, backend: &B) -> Result<Post, PostError> {
        let _busy = self.busy.enter();

        let has_media = self.media.is_some();
        let content = self
            .rules
            .validate(&self.content, Target::Post { has_media })?;

        let upload = match &self.media {
            Some(media) => Some(upload_media(backend, self.user_id, media).await?),
            None => None,
        };

        let (key, image_url) = upload.unzip();
        let new_post = NewPost::text(self.user_id, content, image_url);
        let post = backend
            .insert_post(&new_post)
            .await
            .map_err(|e| {
                if let Some(key) = &key {
                    tracing::warn!(%key, "Post insert failed, uploaded media is orphaned");
                }
                tracing::error!("Failed to insert post: {}", e);
                PostError::Insert(e)
            })?;

        tracing::info!(post_id = %post.id, "Post created");
        notify_mentions(backend, post.id, &new_post.content).await?;

        self.reset();
        if let Some(callback) = self.on_created.as_mut() {
            callback(&post);
        }

        Ok(post)
    }

    fn reset(&mut self) {
        self.content.clear();
        self.media = None;
        self.open = false;
    }
}

/// Upload an attachment, returning its storage key and public URL
async fn upload_media<B: Backend>(
    backend: &B,
    user_id: Uuid,
    media: &MediaAttachment,
) -> Result<(String, String), PostError> {
    let key = storage_key(user_id, Utc::now(), media.extension());
    tracing::debug!(%key, content_type = media.content_type(), "Uploading media");

    backend
        .upload_media(&key, media.bytes().to_vec(), media.content_type())
        .await
        .map_err(|e| {
            tracing::error!(%key, "Media upload failed: {}", e);
            PostError::from_upload(e)
        })?;

    let url = backend.public_url(&key);
    Ok((key, url))
}
