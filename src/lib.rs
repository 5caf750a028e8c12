//! # Balze
//!
//! Client core for the Balze social network.
//!
//! ## Overview
//!
//! Balze users write posts (text plus an optional media file), quote other
//! posts, and tag each other with `@mentions`. Auth, row-level permissions,
//! storage quotas and notification fan-out all live in a managed backend; this
//! crate holds the client-side workflows that drive it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Composers                            │
//! │  validate → upload media → insert post → notify mentions    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │   Validation    │ │       API       │ │      Media      │
//! │                 │ │                 │ │                 │
//! │ • Length rules  │ │ • Backend trait │ │ • Attachments   │
//! │ • Characters    │ │ • Supabase      │ │ • Preview URLs  │
//! │ • Mentions      │ │ • Storage / RPC │ │ • Storage keys  │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │   Permissions   │ │      Gate       │ │     Events      │
//! │                 │ │                 │ │                 │
//! │ • Role lookup   │ │ • Admin / mod   │ │ • Post counters │
//! │ • Least priv.   │ │ • Redirect      │ │ • Pub / sub     │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Backend trait and the Supabase client
//! - [`composer`] - Post and quote composers, quote preview widget
//! - [`config`] - Configuration management
//! - [`error`] - Submission errors
//! - [`events`] - Post update event bus
//! - [`gate`] - Admin-only surface gate
//! - [`media`] - Local media attachments
//! - [`mentions`] - `@username` extraction
//! - [`models`] - Data models (Post, Profile, Role)
//! - [`permissions`] - Viewer role resolution
//! - [`theme`] - Theme support via ratatui-themes
//! - [`validation`] - Content rules
//!
//! ## Example
//!
//! ```no_run
//! use balze::api::supabase::SupabaseClient;
//! use balze::composer::PostComposer;
//! use balze::media::PreviewRegistry;
//! use balze::Config;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let backend = SupabaseClient::from_config(&config)?;
//! let session = config.session()?;
//!
//! let mut composer = PostComposer::new(session.user_id, PreviewRegistry::new());
//! composer.set_content("hello @alice");
//! let post = composer.submit(&backend).await?;
//! println!("created {}", post.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::future_not_send)]

pub mod api;
pub mod composer;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod media;
pub mod mentions;
pub mod models;
pub mod paths;
pub mod permissions;
pub mod theme;
pub mod validation;

// Re-export main types for convenience
pub use api::{Backend, BackendError};
pub use config::Config;
pub use error::PostError;
pub use events::{PostEventBus, PostUpdatePayload};
pub use models::{NewPost, Post, Profile, QuotedPost, Role};
pub use theme::{Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::ThemeName;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
