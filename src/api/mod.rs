//! REST client for the pull-request endpoints of a Harness Code / Gitness server.

pub mod auth;
pub mod client;
pub mod error;

pub use client::CodeClient;
pub use error::{ApiError, error_message};
