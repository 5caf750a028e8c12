//! Errors raised by the post workflows

use thiserror::Error;

use crate::api::BackendError;
use crate::validation::ValidationError;

/// Message shown when media storage has no space left
pub const STORAGE_FULL_MESSAGE: &str =
    "Storage is full. Please contact support or try again later.";

/// Marker the storage backend puts in its message when it runs out of space
pub const STORAGE_EXHAUSTED_MARKER: &str = "No space left";

/// Failure of a post or quote submission
#[derive(Debug, Error)]
pub enum PostError {
    /// Content rejected locally, before any network call
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// The media store reported it is out of space
    #[error("{}", STORAGE_FULL_MESSAGE)]
    StorageExhausted,
    /// Media upload failed for any other reason
    #[error("media upload failed: {0}")]
    Upload(#[source] BackendError),
    /// The post record could not be inserted
    #[error("failed to insert post: {0}")]
    Insert(#[source] BackendError),
    /// Tagged users could not be notified
    #[error("failed to notify tagged users: {0}")]
    Notification(#[source] BackendError),
}

impl PostError {
    /// Classify an upload failure
    pub fn from_upload(err: BackendError) -> Self {
        if err.message().contains(STORAGE_EXHAUSTED_MARKER) {
            Self::StorageExhausted
        } else {
            Self::Upload(err)
        }
    }

    /// Text shown to the user; `fallback` is the generic failure message
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::StorageExhausted => STORAGE_FULL_MESSAGE.to_string(),
            Self::Upload(_) | Self::Insert(_) | Self::Notification(_) => {
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(message: &str) -> BackendError {
        BackendError::Http {
            status: 400,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_storage_exhaustion_is_distinguished() {
        let err = PostError::from_upload(http("write failed: No space left on device"));
        assert!(matches!(err, PostError::StorageExhausted));
        assert_eq!(err.user_message("Failed to create post"), STORAGE_FULL_MESSAGE);
    }

    #[test]
    fn test_other_upload_failures_are_generic() {
        let err = PostError::from_upload(http("mime type not allowed"));
        assert!(matches!(err, PostError::Upload(_)));
        assert_eq!(err.user_message("Failed to create post"), "Failed to create post");
    }

    #[test]
    fn test_notification_failure_looks_like_insert_failure() {
        let notify = PostError::Notification(http("rpc failed"));
        let insert = PostError::Insert(http("rls violation"));
        assert_eq!(notify.user_message("x"), insert.user_message("x"));
    }
}
