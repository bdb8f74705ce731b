//! Storage trait scoped to one user

use crate::error::Result;
use crate::progress::ProgressUpdate;
use crate::types::{
    CreatePlaylist, Episode, EpisodeId, ImportFeed, ImportSummary, ListeningProgress, Playlist,
    PlaylistId, PlaylistItem, PlaylistItemId, PlaylistItemRef, Podcast, PodcastId, QueueItem,
    QueueItemId, Reorder, Subscription, UpdatePlaylist,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Every per-user operation (queue, playlists, progress, subscriptions) is
/// scoped to the user the context was built for. Ordered-list mutations
/// return the full list in its new order.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Podcasts & Episodes
    // ========================================================================

    /// Store a parsed feed; known episode guids are skipped
    async fn import_feed(&self, feed: ImportFeed) -> Result<ImportSummary>;

    /// Get all known podcasts
    async fn get_all_podcasts(&self) -> Result<Vec<Podcast>>;

    /// Get podcast by ID
    async fn get_podcast(&self, id: PodcastId) -> Result<Option<Podcast>>;

    /// Get a podcast's episodes, newest first
    async fn get_podcast_episodes(&self, id: PodcastId) -> Result<Vec<Episode>>;

    /// Get episode by ID
    async fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>>;

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Get the user's subscriptions
    async fn get_subscriptions(&self) -> Result<Vec<Subscription>>;

    /// Subscribe to a podcast
    async fn subscribe(&self, podcast_id: PodcastId) -> Result<Subscription>;

    /// Unsubscribe from a podcast
    async fn unsubscribe(&self, podcast_id: PodcastId) -> Result<()>;

    // ========================================================================
    // Queue
    // ========================================================================

    /// Get the user's queue in play order
    async fn get_queue(&self) -> Result<Vec<QueueItem>>;

    /// Append an episode, or insert it at `position` when given
    async fn enqueue(&self, episode_id: EpisodeId, position: Option<i64>)
        -> Result<Vec<QueueItem>>;

    /// Place an episode right after the currently playing one
    async fn play_next(
        &self,
        episode_id: EpisodeId,
        current_episode_id: Option<EpisodeId>,
    ) -> Result<Vec<QueueItem>>;

    /// Move one queue item
    async fn move_queue_item(&self, id: QueueItemId, position: i64) -> Result<Vec<QueueItem>>;

    /// Replace all queue positions at once
    async fn reorder_queue(&self, order: Vec<Reorder<QueueItemId>>) -> Result<Vec<QueueItem>>;

    /// Remove one queue item
    async fn remove_queue_item(&self, id: QueueItemId) -> Result<Vec<QueueItem>>;

    /// Remove every queue item
    async fn clear_queue(&self) -> Result<()>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Get the user's playlists
    async fn get_user_playlists(&self) -> Result<Vec<Playlist>>;

    /// Get playlist with items
    async fn get_playlist_with_items(&self, id: PlaylistId) -> Result<Playlist>;

    /// Create a new playlist
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Rename or re-describe a playlist
    async fn update_playlist(&self, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist>;

    /// Delete playlist
    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    /// Append an item, or insert it at `position` when given
    async fn add_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item: PlaylistItemRef,
        position: Option<i64>,
    ) -> Result<Vec<PlaylistItem>>;

    /// Move one playlist item
    async fn move_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item_id: PlaylistItemId,
        position: i64,
    ) -> Result<Vec<PlaylistItem>>;

    /// Replace all item positions at once
    async fn reorder_playlist(
        &self,
        playlist_id: PlaylistId,
        order: Vec<Reorder<PlaylistItemId>>,
    ) -> Result<Vec<PlaylistItem>>;

    /// Remove one playlist item
    async fn remove_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item_id: PlaylistItemId,
    ) -> Result<Vec<PlaylistItem>>;

    // ========================================================================
    // Listening Progress
    // ========================================================================

    /// Get progress on an episode
    async fn get_progress(&self, episode_id: EpisodeId) -> Result<Option<ListeningProgress>>;

    /// Record a position report
    async fn record_progress(
        &self,
        episode_id: EpisodeId,
        update: ProgressUpdate,
    ) -> Result<ListeningProgress>;

    /// Flag an episode as completed
    async fn mark_completed(&self, episode_id: EpisodeId) -> Result<ListeningProgress>;

    /// Forget progress on an episode
    async fn reset_progress(&self, episode_id: EpisodeId) -> Result<()>;

    /// Most recently updated progress records
    async fn get_recent_history(&self, limit: i64) -> Result<Vec<ListeningProgress>>;
}
