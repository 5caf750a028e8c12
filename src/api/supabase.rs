//! Supabase (PostgREST + Storage + RPC) backend client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{NewPost, Post, QuotedPost, Role};

use super::{Backend, BackendError};

/// Default storage bucket for post media
pub const DEFAULT_BUCKET: &str = "profiles";

/// Supabase API client
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: String,
    bucket: String,
}

impl SupabaseClient {
    /// Create a new client for a project URL
    pub fn new(
        base_url: &str,
        anon_key: &str,
        access_token: &str,
        bucket: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: access_token.to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Build a client from the loaded configuration and session
    pub fn from_config(config: &Config) -> Result<Self> {
        let session = config.session()?;
        let backend = &config.backend;

        anyhow::ensure!(!backend.url.is_empty(), "Backend URL is not configured");

        Self::new(
            &backend.url,
            &backend.anon_key,
            &session.access_token,
            &backend.bucket,
            Duration::from_secs(backend.timeout_secs),
        )
        .context("Failed to build HTTP client")
    }

    /// Fetch a post with its author profile, for quoting from outside the feed
    pub async fn fetch_quoted_post(&self, post_id: Uuid) -> Result<QuotedPost, BackendError> {
        let url = self.rest_url(&format!(
            "/posts?id=eq.{}&select=id,content,image_url,created_at,profiles(username,display_name,avatar_url)",
            urlencoding::encode(&post_id.to_string())
        ));

        let response = self
            .authorized(self.client.get(&url))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Build a PostgREST URL
    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1{}", self.base_url, path)
    }

    /// Build a storage URL for an object key
    fn object_url(&self, scope: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}{}/{}",
            self.base_url,
            scope,
            self.bucket,
            encode_key(key)
        )
    }

    /// Insert returning the stored row as a single object
    fn insert_request(&self, post: &NewPost) -> RequestBuilder {
        self.authorized(self.client.post(self.rest_url("/posts")))
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(post)
    }

    /// Batched mention notification RPC
    fn notify_request(&self, post_id: Uuid, usernames: &[String]) -> RequestBuilder {
        let body = NotifyTaggedUsersRequest {
            post_id_param: post_id,
            tagged_usernames: usernames,
        };

        self.authorized(self.client.post(self.rest_url("/rpc/notify_tagged_users")))
            .json(&body)
    }

    /// Storage upload that overwrites an existing object
    fn upload_request(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> RequestBuilder {
        self.authorized(self.client.post(self.object_url("", key)))
            .header("x-upsert", "true")
            .header("Content-Type", content_type)
            .body(bytes)
    }

    /// Attach the API key and bearer token
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = if self.access_token.is_empty() {
            &self.anon_key
        } else {
            &self.access_token
        };

        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {token}"))
    }
}

impl Backend for SupabaseClient {
    async fn insert_post(&self, post: &NewPost) -> Result<Post, BackendError> {
        let response = self.insert_request(post).send().await?;

        let response = check_status(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn notify_tagged_users(
        &self,
        post_id: Uuid,
        usernames: &[String],
    ) -> Result<(), BackendError> {
        let response = self.notify_request(post_id, usernames).send().await?;

        check_status(response).await?;
        Ok(())
    }

    async fn upload_media(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let response = self.upload_request(key, bytes, content_type).send().await?;

        check_status(response).await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.object_url("public/", key)
    }

    async fn fetch_role(&self, user_id: Uuid) -> Result<Role, BackendError> {
        let url = self.rest_url(&format!(
            "/user_roles?user_id=eq.{}&select=role",
            urlencoding::encode(&user_id.to_string())
        ));

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;

        let rows: Vec<RoleRow> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(highest_role(&rows))
    }
}

// Request/response types

#[derive(Debug, Serialize)]
struct NotifyTaggedUsersRequest<'a> {
    post_id_param: Uuid,
    tagged_usernames: &'a [String],
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Highest known role among the rows (unknown roles are ignored)
fn highest_role(rows: &[RoleRow]) -> Role {
    rows.iter()
        .filter_map(|row| Role::from_str(&row.role))
        .max()
        .unwrap_or_default()
}

/// Percent-encode each path segment of a storage key
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turn a non-success response into [`BackendError::Http`]
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Http {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull the human-readable message out of an error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}
