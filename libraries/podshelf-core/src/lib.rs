//! Podshelf Core
//!
//! Platform-agnostic domain types, traits, and error handling for Podshelf.
//!
//! This crate provides the foundational building blocks shared by the storage
//! layer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Podcast`, `Episode`, `QueueItem`, `Playlist`, `ListeningProgress`
//! - **Core Traits**: `StorageContext`
//! - **Ordering**: pure planning for dense position lists (queue, playlists)
//! - **Progress**: the listening-session recorder
//! - **Error Handling**: unified `PodError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use podshelf_core::ordering::{plan_move, Shift};
//!
//! // Moving the item at position 2 to the front of a three item list
//! let shift = plan_move(2, 0, 3).unwrap();
//! assert_eq!(shift, Some(Shift { start: 0, end: 1, delta: 1 }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ordering;
pub mod progress;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{PodError, Result};
pub use progress::{ProgressPolicy, ProgressUpdate};
pub use storage::StorageContext;

pub use types::{
    CreatePlaylist, Episode, EpisodeId, ImportFeed, ImportSummary, ListeningProgress,
    ListeningSession, NewEpisode, NewPodcast, Playlist, PlaylistId, PlaylistItem,
    PlaylistItemId, PlaylistItemRef, Podcast, PodcastId, QueueItem, QueueItemId, Reorder,
    Subscription, UpdatePlaylist, User, UserId,
};
