//! Post model (as stored in the `posts` table)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Profile;

/// A stored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier
    pub id: Uuid,
    /// Author identifier
    pub user_id: Uuid,
    /// Text content (trimmed on insert)
    pub content: String,
    /// Public URL of the attached media, if any
    #[serde(default)]
    pub image_url: Option<String>,
    /// The post this one quotes, if any
    #[serde(default)]
    pub quoted_post_id: Option<Uuid>,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Number of likes
    #[serde(default)]
    pub likes_count: u32,
    /// Number of broken-heart reactions
    #[serde(default)]
    pub broken_hearts_count: u32,
    /// Number of reposts
    #[serde(default)]
    pub reposts_count: u32,
    /// Number of comments
    #[serde(default)]
    pub comments_count: u32,
}

impl Post {
    /// Whether this post quotes another post
    pub const fn is_quote(&self) -> bool {
        self.quoted_post_id.is_some()
    }
}

/// Row sent to the backend when creating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    /// Author identifier
    pub user_id: Uuid,
    /// Trimmed text content
    pub content: String,
    /// Public URL of uploaded media
    pub image_url: Option<String>,
    /// Quoted post identifier
    pub quoted_post_id: Option<Uuid>,
}

impl NewPost {
    /// A plain post, optionally carrying uploaded media
    pub fn text(user_id: Uuid, content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            image_url,
            quoted_post_id: None,
        }
    }

    /// A quote of another post
    pub fn quote(user_id: Uuid, content: impl Into<String>, quoted_post_id: Uuid) -> Self {
        Self {
            user_id,
            content: content.into(),
            image_url: None,
            quoted_post_id: Some(quoted_post_id),
        }
    }
}

/// The post being quoted, as the caller already holds it in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedPost {
    /// Post identifier
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Attached media URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the quoted post was created
    pub created_at: DateTime<Utc>,
    /// Author profile
    #[serde(rename = "profiles")]
    pub author: Profile,
}

/// Format the distance between `then` and `now` as "N units ago"
pub fn relative_time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(then);

    let (value, unit) = if duration.num_seconds() < 60 {
        return "less than a minute ago".to_string();
    } else if duration.num_minutes() < 60 {
        (duration.num_minutes(), "minute")
    } else if duration.num_hours() < 24 {
        (duration.num_hours(), "hour")
    } else if duration.num_days() < 30 {
        (duration.num_days(), "day")
    } else if duration.num_days() < 365 {
        (duration.num_days() / 30, "month")
    } else {
        (duration.num_days() / 365, "year")
    };

    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}
