//! Talks to a Mattermost server through its REST API v4: raw queries, and
//! posting a structured message to a channel or user.
//!
//! See [message::notify].

pub mod api;
pub mod auth;
pub mod channel;
pub mod error;
pub mod json;
pub mod message;

pub use error::MattermostError;
