use crate::{playlists, podcasts, progress, queue, subscriptions};
use async_trait::async_trait;
use podshelf_core::{
    error::Result, storage::StorageContext, types::*, PodError, ProgressPolicy, ProgressUpdate,
};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
pub struct LocalStorageContext {
    pool: SqlitePool,
    user_id: UserId,
    policy: ProgressPolicy,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool, user_id: UserId, policy: ProgressPolicy) -> Self {
        Self {
            pool,
            user_id,
            policy,
        }
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    // Podcasts & Episodes
    async fn import_feed(&self, feed: ImportFeed) -> Result<ImportSummary> {
        podcasts::import(&self.pool, feed).await
    }

    async fn get_all_podcasts(&self) -> Result<Vec<Podcast>> {
        podcasts::get_all(&self.pool).await
    }

    async fn get_podcast(&self, id: PodcastId) -> Result<Option<Podcast>> {
        podcasts::get_by_id(&self.pool, &id).await
    }

    async fn get_podcast_episodes(&self, id: PodcastId) -> Result<Vec<Episode>> {
        podcasts::get_episodes(&self.pool, &id).await
    }

    async fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>> {
        podcasts::get_episode(&self.pool, &id).await
    }

    // Subscriptions
    async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        subscriptions::get_all(&self.pool, &self.user_id).await
    }

    async fn subscribe(&self, podcast_id: PodcastId) -> Result<Subscription> {
        subscriptions::subscribe(&self.pool, &self.user_id, &podcast_id).await
    }

    async fn unsubscribe(&self, podcast_id: PodcastId) -> Result<()> {
        subscriptions::unsubscribe(&self.pool, &self.user_id, &podcast_id).await
    }

    // Queue
    async fn get_queue(&self) -> Result<Vec<QueueItem>> {
        queue::get_all(&self.pool, &self.user_id).await
    }

    async fn enqueue(
        &self,
        episode_id: EpisodeId,
        position: Option<i64>,
    ) -> Result<Vec<QueueItem>> {
        queue::enqueue(&self.pool, &self.user_id, &episode_id, position).await
    }

    async fn play_next(
        &self,
        episode_id: EpisodeId,
        current_episode_id: Option<EpisodeId>,
    ) -> Result<Vec<QueueItem>> {
        queue::play_next(
            &self.pool,
            &self.user_id,
            &episode_id,
            current_episode_id.as_ref(),
        )
        .await
    }

    async fn move_queue_item(&self, id: QueueItemId, position: i64) -> Result<Vec<QueueItem>> {
        queue::move_item(&self.pool, &self.user_id, &id, position).await
    }

    async fn reorder_queue(&self, order: Vec<Reorder<QueueItemId>>) -> Result<Vec<QueueItem>> {
        queue::reorder(&self.pool, &self.user_id, &order).await
    }

    async fn remove_queue_item(&self, id: QueueItemId) -> Result<Vec<QueueItem>> {
        queue::remove(&self.pool, &self.user_id, &id).await
    }

    async fn clear_queue(&self) -> Result<()> {
        queue::clear(&self.pool, &self.user_id).await
    }

    // Playlists
    async fn get_user_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_user_playlists(&self.pool, &self.user_id).await
    }

    async fn get_playlist_with_items(&self, id: PlaylistId) -> Result<Playlist> {
        playlists::get_with_items(&self.pool, &id, &self.user_id).await
    }

    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        if playlist.owner_id != self.user_id {
            return Err(PodError::permission_denied(
                "cannot create a playlist for another user",
            ));
        }
        playlists::create(&self.pool, playlist).await
    }

    async fn update_playlist(&self, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
        playlists::update(&self.pool, &id, update, &self.user_id).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, &id, &self.user_id).await
    }

    async fn add_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item: PlaylistItemRef,
        position: Option<i64>,
    ) -> Result<Vec<PlaylistItem>> {
        playlists::add_item(&self.pool, &playlist_id, &item, position, &self.user_id).await
    }

    async fn move_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item_id: PlaylistItemId,
        position: i64,
    ) -> Result<Vec<PlaylistItem>> {
        playlists::move_item(&self.pool, &playlist_id, &item_id, position, &self.user_id).await
    }

    async fn reorder_playlist(
        &self,
        playlist_id: PlaylistId,
        order: Vec<Reorder<PlaylistItemId>>,
    ) -> Result<Vec<PlaylistItem>> {
        playlists::reorder_items(&self.pool, &playlist_id, &order, &self.user_id).await
    }

    async fn remove_playlist_item(
        &self,
        playlist_id: PlaylistId,
        item_id: PlaylistItemId,
    ) -> Result<Vec<PlaylistItem>> {
        playlists::remove_item(&self.pool, &playlist_id, &item_id, &self.user_id).await
    }

    // Listening Progress
    async fn get_progress(&self, episode_id: EpisodeId) -> Result<Option<ListeningProgress>> {
        progress::get(&self.pool, &self.user_id, &episode_id).await
    }

    async fn record_progress(
        &self,
        episode_id: EpisodeId,
        update: ProgressUpdate,
    ) -> Result<ListeningProgress> {
        progress::record(&self.pool, &self.user_id, &episode_id, &update, &self.policy).await
    }

    async fn mark_completed(&self, episode_id: EpisodeId) -> Result<ListeningProgress> {
        progress::mark_completed(&self.pool, &self.user_id, &episode_id, &self.policy).await
    }

    async fn reset_progress(&self, episode_id: EpisodeId) -> Result<()> {
        progress::reset(&self.pool, &self.user_id, &episode_id).await
    }

    async fn get_recent_history(&self, limit: i64) -> Result<Vec<ListeningProgress>> {
        progress::get_recent(&self.pool, &self.user_id, limit).await
    }
}
