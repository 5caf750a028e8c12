//! Composer for quote posts

use uuid::Uuid;

use crate::api::Backend;
use crate::error::PostError;
use crate::models::{NewPost, Post, QuotedPost};
use crate::theme::ThemeColors;
use crate::validation::{ContentRules, Target};

use super::{BusyFlag, OnCreated, QuotePreview, Toast, notify_mentions};

/// Toast shown after a quote is created
pub const QUOTE_CREATED: &str = "Quote post created!";

/// Generic failure message for the quote composer
pub const QUOTE_FAILED: &str = "Failed to create quote post";

/// State of the "quote post" dialog
pub struct QuoteComposer {
    user_id: Uuid,
    quoted: QuotedPost,
    rules: ContentRules,
    notify_mentions: bool,
    content: String,
    open: bool,
    busy: BusyFlag,
    on_quoted: Option<OnCreated>,
}

impl QuoteComposer {
    /// Open a quote dialog for `quoted`
    pub fn new(user_id: Uuid, quoted: QuotedPost) -> Self {
        Self {
            user_id,
            quoted,
            rules: ContentRules::default(),
            notify_mentions: false,
            content: String::new(),
            open: true,
            busy: BusyFlag::default(),
            on_quoted: None,
        }
    }

    /// Use custom content rules
    pub fn with_rules(mut self, rules: ContentRules) -> Self {
        self.rules = rules;
        self
    }

    /// Also notify users mentioned in the quote text
    pub fn notify_mentions(mut self, enabled: bool) -> Self {
        self.notify_mentions = enabled;
        self
    }

    /// Callback fired after each successful quote
    pub fn on_quote_posted(mut self, callback: impl FnMut(&Post) + Send + 'static) -> Self {
        self.on_quoted = Some(Box::new(callback));
        self
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

    /// The post being quoted
    pub const fn quoted(&self) -> &QuotedPost {
        &self.quoted
    }

    /// Read-only preview of the quoted post
    pub fn preview(&self, colors: ThemeColors) -> QuotePreview<'_> {
        QuotePreview::new(&self.quoted, colors)
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
        Toast::from_result(result, QUOTE_CREATED, QUOTE_FAILED)
    }

    /// Validate and insert the quote
    pub async fn submit<B: Backend>(&mut self, backend: &B) -> Result<Post, PostError> {
        let content = self.rules.validate(&self.content, Target::Quote)?;

        let _busy = self.busy.enter();
        let new_post = NewPost::quote(self.user_id, content, self.quoted.id);
        let post = backend
            .insert_post(&new_post)
            .await
            .map_err(|e| {
                tracing::error!(quoted = %self.quoted.id, "Failed to insert quote post: {}", e);
                PostError::Insert(e)
            })?;

        tracing::info!(post_id = %post.id, quoted = %self.quoted.id, "Quote post created");
        if self.notify_mentions {
            notify_mentions(backend, post.id, &new_post.content).await?;
        }

        self.content.clear();
        self.open = false;
        if let Some(callback) = self.on_quoted.as_mut() {
            callback(&post);
        }

        Ok(post)
    }
}
