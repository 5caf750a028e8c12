//! Backend clients
//!
//! Every operation in this crate is a single request/response call to the
//! managed backend. The [`Backend`] trait is the seam the composers and the
//! permission hook are written against; [`supabase::SupabaseClient`] is the
//! HTTP implementation.

#[cfg(test)]
pub(crate) mod mock;
pub mod supabase;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewPost, Post, Role};

/// Errors reported by a backend call
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("backend error {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
    /// The request never completed
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not what we expected
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    /// The backend-provided message, used to classify storage failures
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::Decode(message) => message.clone(),
            Self::Transport(e) => e.to_string(),
        }
    }
}

/// Unified backend API used by the client workflows
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Insert a post record and return the stored row
    async fn insert_post(&self, post: &NewPost) -> Result<Post, BackendError>;

    /// Notify tagged users about a new post (one batched call)
    async fn notify_tagged_users(
        &self,
        post_id: Uuid,
        usernames: &[String],
    ) -> Result<(), BackendError>;

    /// Upload an object to media storage, overwriting on conflict
    async fn upload_media(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;

    /// Public URL for a stored object
    fn public_url(&self, key: &str) -> String;

    /// Look up the role of a user
    async fn fetch_role(&self, user_id: Uuid) -> Result<Role, BackendError>;
}
