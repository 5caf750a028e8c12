//! Recording in-memory backend for tests

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::composer::BusyFlag;
use crate::models::{NewPost, Post, Role};

use super::{Backend, BackendError};

/// A call observed by [`MockBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload {
        key: String,
        bytes: Vec<u8>,
        content_type: String,
    },
    Insert(NewPost),
    Notify { post_id: Uuid, usernames: Vec<String> },
    FetchRole(Uuid),
}

/// Backend that records every call and fails on demand
#[derive(Default)]
pub struct MockBackend {
    pub calls: Mutex<Vec<Call>>,
    pub upload_error: Option<String>,
    pub insert_error: Option<String>,
    pub notify_error: Option<String>,
    pub role: Option<Role>,
    /// Content the backend reports back instead of what was inserted
    pub stored_content: Option<String>,
    /// Flag sampled on every insert, into `busy_seen`
    pub busy_watch: Option<BusyFlag>,
    pub busy_seen: Mutex<Vec<bool>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail(message: &str) -> BackendError {
        BackendError::Http {
            status: 500,
            message: message.to_string(),
        }
    }
}

impl Backend for MockBackend {
    async fn insert_post(&self, post: &NewPost) -> Result<Post, BackendError> {
        self.record(Call::Insert(post.clone()));
        if let Some(flag) = &self.busy_watch {
            self.busy_seen.lock().unwrap().push(flag.is_set());
        }
        if let Some(message) = &self.insert_error {
            return Err(Self::fail(message));
        }

        Ok(Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            content: self
                .stored_content
                .clone()
                .unwrap_or_else(|| post.content.clone()),
            image_url: post.image_url.clone(),
            quoted_post_id: post.quoted_post_id,
            created_at: Utc::now(),
            likes_count: 0,
            broken_hearts_count: 0,
            reposts_count: 0,
            comments_count: 0,
        })
    }

    async fn notify_tagged_users(
        &self,
        post_id: Uuid,
        usernames: &[String],
    ) -> Result<(), BackendError> {
        self.record(Call::Notify {
            post_id,
            usernames: usernames.to_vec(),
        });
        match &self.notify_error {
            Some(message) => Err(Self::fail(message)),
            None => Ok(()),
        }
    }

    async fn upload_media(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        self.record(Call::Upload {
            key: key.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });
        match &self.upload_error {
            Some(message) => Err(Self::fail(message)),
            None => Ok(()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }

    async fn fetch_role(&self, user_id: Uuid) -> Result<Role, BackendError> {
        self.record(Call::FetchRole(user_id));
        self.role
            .ok_or_else(|| BackendError::Decode("role lookup failed".to_string()))
    }
}
