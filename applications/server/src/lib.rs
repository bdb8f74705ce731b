//! Podshelf Server Library
//!
//! Multi-user podcast tracker API: subscriptions, play queues, playlists and
//! listening progress behind API-key authentication.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
