//! Post and quote composers
//!
//! Both composers follow the same path: validate locally, upload media if
//! any, insert the post record, notify mentioned users, then reset the form
//! and fire the completion callback. Nothing is retried; a failure leaves the
//! form as it was so the user can try again.

mod post;
mod preview;
mod quote;

pub use post::PostComposer;
pub use preview::QuotePreview;
pub use quote::QuoteComposer;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::api::Backend;
use crate::error::PostError;
use crate::mentions::extract_mentions;
use crate::models::Post;

/// Callback fired once after a post is created, so the feed can refresh
pub type OnCreated = Box<dyn FnMut(&Post) + Send>;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// Transient message shown to the user after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Success or error
    pub kind: ToastKind,
    /// Text to show
    pub message: String,
}

impl Toast {
    /// Success toast
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// Error toast
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    fn from_result(result: &Result<Post, PostError>, success: &str, fallback: &str) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(e) => Self::error(e.user_message(fallback)),
        }
    }
}

/// Shared "submission in flight" flag
///
/// A render loop keeps a clone and disables the submit control while it is
/// set.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Whether a submission is in flight
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn enter(&self) -> BusyGuard {
        self.0.store(true, Ordering::Release);
        BusyGuard(Arc::clone(&self.0))
    }
}

/// Clears the flag when the submission finishes or is dropped
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Send one batched notification for the mentions in the submitted `content`
async fn notify_mentions<B: Backend>(
    backend: &B,
    post_id: Uuid,
    content: &str,
) -> Result<(), PostError> {
    let usernames = extract_mentions(content);
    if usernames.is_empty() {
        return Ok(());
    }

    tracing::debug!(%post_id, ?usernames, "Notifying tagged users");
    backend
        .notify_tagged_users(post_id, &usernames)
        .await
        .map_err(|e| {
            tracing::error!(%post_id, "Failed to notify tagged users: {}", e);
            PostError::Notification(e)
        })
}
