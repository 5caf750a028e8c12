//! Post update event bus
//!
//! Several independent views can show the counters of the same post (feed
//! card, detail view, quote preview). Whoever changes a counter publishes a
//! [`PostUpdatePayload`]; every subscribed view receives it and keeps the
//! updates for its own post.
//!
//! Delivery is synchronous: `publish` returns after every handler that was
//! subscribed at publish time has run once, in subscription order. There is no
//! replay for late subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the post update event
pub const POST_UPDATE_EVENT: &str = "balze:update-post";

/// Counter update for one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdatePayload {
    /// Post the update is for
    #[serde(rename = "postId")]
    pub post_id: Uuid,
    /// New like count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u32>,
    /// New broken-heart reaction count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken_hearts_count: Option<u32>,
    /// New repost count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reposts_count: Option<u32>,
    /// New comment count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u32>,
}

impl PostUpdatePayload {
    /// Payload with no counters set
    pub fn new(post_id: Uuid) -> Self {
        Self {
            post_id,
            ..Default::default()
        }
    }

    /// Set the like count
    pub const fn likes(mut self, count: u32) -> Self {
        self.likes_count = Some(count);
        self
    }

    /// Set the broken-heart count
    pub const fn broken_hearts(mut self, count: u32) -> Self {
        self.broken_hearts_count = Some(count);
        self
    }

    /// Set the repost count
    pub const fn reposts(mut self, count: u32) -> Self {
        self.reposts_count = Some(count);
        self
    }

    /// Set the comment count
    pub const fn comments(mut self, count: u32) -> Self {
        self.comments_count = Some(count);
        self
    }
}

/// Counters shown for a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostCounters {
    /// Likes
    pub likes: u32,
    /// Broken-heart reactions
    pub broken_hearts: u32,
    /// Reposts
    pub reposts: u32,
    /// Comments
    pub comments: u32,
}

impl PostCounters {
    /// Fold the fields a payload carries into these counters
    pub fn apply(&mut self, payload: &PostUpdatePayload) {
        if let Some(n) = payload.likes_count {
            self.likes = n;
        }
        if let Some(n) = payload.broken_hearts_count {
            self.broken_hearts = n;
        }
        if let Some(n) = payload.reposts_count {
            self.reposts = n;
        }
        if let Some(n) = payload.comments_count {
            self.comments = n;
        }
    }
}

impl From<&crate::models::Post> for PostCounters {
    fn from(post: &crate::models::Post) -> Self {
        Self {
            likes: post.likes_count,
            broken_hearts: post.broken_hearts_count,
            reposts: post.reposts_count,
            comments: post.comments_count,
        }
    }
}

type Handler = Arc<dyn Fn(&PostUpdatePayload) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Publish/subscribe registry for post updates
///
/// Cloning the bus gives another handle to the same registry.
#[derive(Clone, Default)]
pub struct PostEventBus {
    registry: Arc<Mutex<Registry>>,
}

impl PostEventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every post update
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&PostUpdatePayload) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Register a handler that only sees updates for `post_id`
    pub fn subscribe_post<F>(&self, post_id: Uuid, handler: F) -> Subscription
    where
        F: Fn(&PostUpdatePayload) + Send + Sync + 'static,
    {
        self.subscribe(move |payload| {
            if payload.post_id == post_id {
                handler(payload);
            }
        })
    }

    /// Deliver a payload to every current subscriber
    pub fn publish(&self, payload: &PostUpdatePayload) {
        // Handlers may subscribe or unsubscribe while we dispatch
        let handlers: Vec<Handler> = self
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::debug!(
            event = POST_UPDATE_EVENT,
            post_id = %payload.post_id,
            subscribers = handlers.len(),
            "Publishing post update"
        );

        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PostEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostEventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`PostEventBus::subscribe`]; unsubscribes on drop
#[must_use = "dropping the subscription unsubscribes the handler"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the handler from the bus
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        // The handler is dropped after the lock is released, since it may own
        // other subscriptions to this bus.
        let removed = {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .handlers
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| registry.handlers.remove(index))
        };
        drop(removed);
    }
}
