//! Domain types

mod ids;
mod playlist;
mod podcast;
mod progress;
mod queue;
mod user;

pub use ids::{EpisodeId, PlaylistId, PlaylistItemId, PodcastId, QueueItemId, UserId};
pub use playlist::{CreatePlaylist, Playlist, PlaylistItem, PlaylistItemRef, UpdatePlaylist};
pub use podcast::{
    Episode, ImportFeed, ImportSummary, NewEpisode, NewPodcast, Podcast, Subscription,
};
pub use progress::{ListeningProgress, ListeningSession};
pub use queue::{QueueItem, Reorder};
pub use user::User;
