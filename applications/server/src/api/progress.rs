/// Listening progress API routes
use crate::{
    error::{Result, ServerError},
    extract::{Validate, ValidatedJson},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use podshelf_core::{
    storage::StorageContext,
    types::{EpisodeId, ListeningProgress},
    ProgressUpdate,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordProgressRequest {
    pub position_seconds: f64,
    /// Omitted keeps the stored duration
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    /// Omitted keeps the stored completion flag
    #[serde(default)]
    pub completed: Option<bool>,
}

impl Validate for RecordProgressRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.position_seconds.is_finite() || self.position_seconds < 0.0 {
            return Err("position_seconds must be a non-negative number".to_string());
        }
        if self
            .duration_seconds
            .is_some_and(|d| !d.is_finite() || d < 0.0)
        {
            return Err("duration_seconds must be a non-negative number".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/episodes/:id/progress
/// `null` when the caller has no progress on the episode
pub async fn get_progress(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Option<ListeningProgress>>> {
    let progress = app_state
        .storage_for(&auth)
        .get_progress(EpisodeId::new(id))
        .await?;

    Ok(Json(progress))
}

/// PUT /api/episodes/:id/progress
/// Record a position report from a player
pub async fn record_progress(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<RecordProgressRequest>,
) -> Result<Json<ListeningProgress>> {
    let progress = app_state
        .storage_for(&auth)
        .record_progress(
            EpisodeId::new(id),
            ProgressUpdate {
                position_seconds: req.position_seconds,
                duration_seconds: req.duration_seconds,
                completed: req.completed,
            },
        )
        .await?;

    Ok(Json(progress))
}

/// DELETE /api/episodes/:id/progress
pub async fn reset_progress(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage_for(&auth)
        .reset_progress(EpisodeId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/episodes/:id/completed
pub async fn mark_completed(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ListeningProgress>> {
    let progress = app_state
        .storage_for(&auth)
        .mark_completed(EpisodeId::new(id))
        .await?;

    tracing::debug!(
        user_id = %auth.user_id(),
        episode_id = %progress.episode_id,
        "Marked episode completed"
    );

    Ok(Json(progress))
}

/// GET /api/history?limit=
/// Most recently updated progress records
pub async fn recent_history(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ListeningProgress>>> {
    let api = &app_state.config.api;
    let limit = match query.limit {
        Some(limit) if limit < 1 => {
            return Err(ServerError::BadRequest(
                "limit must be at least 1".to_string(),
            ))
        }
        Some(limit) => limit.min(api.max_history_limit),
        None => api.default_history_limit,
    };

    let history = app_state
        .storage_for(&auth)
        .get_recent_history(limit)
        .await?;

    Ok(Json(history))
}
