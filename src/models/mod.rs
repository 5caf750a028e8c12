//! Data models for Balze

mod post;
mod profile;
mod role;

pub use post::{NewPost, Post, QuotedPost, relative_time_since};
pub use profile::Profile;
pub use role::Role;
