/// ID types for Podshelf entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares a string-backed identifier newtype.
///
/// IDs are UUID strings generated on insert. With `sqlx-support` they bind and
/// decode as SQLite `TEXT`.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx-support", derive(sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random ID
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// User identifier
    UserId
);
string_id!(
    /// Podcast identifier
    PodcastId
);
string_id!(
    /// Episode identifier
    EpisodeId
);
string_id!(
    /// Playlist identifier
    PlaylistId
);
string_id!(
    /// Queue item identifier (one row of a user's queue)
    QueueItemId
);
string_id!(
    /// Playlist item identifier (one row of a playlist)
    PlaylistItemId
);
