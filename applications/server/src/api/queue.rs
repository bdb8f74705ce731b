/// Queue API routes
///
/// Every mutation answers with the whole queue in its new order.
use super::{MoveRequest, ReorderRequest};
use crate::{
    error::Result,
    extract::{require_non_blank, require_position, Validate, ValidatedJson},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use podshelf_core::{
    storage::StorageContext,
    types::{EpisodeId, QueueItem, QueueItemId, Reorder},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnqueueRequest {
    pub episode_id: String,
    /// Insert here instead of appending
    #[serde(default)]
    pub position: Option<i64>,
}

impl Validate for EnqueueRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_blank("episode_id", &self.episode_id)?;
        require_position("position", self.position)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayNextRequest {
    pub episode_id: String,
    /// Episode the client is playing right now
    #[serde(default)]
    pub current_episode_id: Option<String>,
}

impl Validate for PlayNextRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_blank("episode_id", &self.episode_id)
    }
}

/// GET /api/queue
pub async fn get_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<QueueItem>>> {
    let queue = app_state.storage_for(&auth).get_queue().await?;
    Ok(Json(queue))
}

/// POST /api/queue
/// Append an episode, or insert it at `position`
pub async fn enqueue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<EnqueueRequest>,
) -> Result<Json<Vec<QueueItem>>> {
    tracing::debug!(
        user_id = %auth.user_id(),
        episode_id = %req.episode_id,
        position = ?req.position,
        "Enqueueing episode"
    );

    let queue = app_state
        .storage_for(&auth)
        .enqueue(EpisodeId::new(req.episode_id), req.position)
        .await?;

    Ok(Json(queue))
}

/// POST /api/queue/play-next
/// Place an episode right after the one currently playing (or at the front)
pub async fn play_next(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<PlayNextRequest>,
) -> Result<Json<Vec<QueueItem>>> {
    let queue = app_state
        .storage_for(&auth)
        .play_next(
            EpisodeId::new(req.episode_id),
            req.current_episode_id.map(EpisodeId::new),
        )
        .await?;

    Ok(Json(queue))
}

/// PUT /api/queue
/// Replace every position at once
pub async fn reorder_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<ReorderRequest>,
) -> Result<Json<Vec<QueueItem>>> {
    let order = req
        .items
        .into_iter()
        .map(|entry| Reorder::new(QueueItemId::new(entry.id), entry.position))
        .collect();

    let queue = app_state.storage_for(&auth).reorder_queue(order).await?;

    Ok(Json(queue))
}

/// DELETE /api/queue
pub async fn clear_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state.storage_for(&auth).clear_queue().await?;

    tracing::debug!(user_id = %auth.user_id(), "Cleared queue");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/queue/:id
pub async fn move_queue_item(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> Result<Json<Vec<QueueItem>>> {
    let queue = app_state
        .storage_for(&auth)
        .move_queue_item(QueueItemId::new(id), req.position)
        .await?;

    Ok(Json(queue))
}

/// DELETE /api/queue/:id
pub async fn remove_queue_item(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<QueueItem>>> {
    let queue = app_state
        .storage_for(&auth)
        .remove_queue_item(QueueItemId::new(id))
        .await?;

    Ok(Json(queue))
}
