/// Subscriptions API routes
use crate::{
    error::Result,
    extract::{require_non_blank, Validate, ValidatedJson},
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
    types::{PodcastId, Subscription},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    pub podcast_id: String,
}

impl Validate for SubscribeRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_blank("podcast_id", &self.podcast_id)
    }
}

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Subscription>>> {
    let subscriptions = app_state.storage_for(&auth).get_subscriptions().await?;
    Ok(Json(subscriptions))
}

/// POST /api/subscriptions
pub async fn subscribe(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<SubscribeRequest>,
) -> Result<(StatusCode, Json<Subscription>)> {
    let subscription = app_state
        .storage_for(&auth)
        .subscribe(PodcastId::new(req.podcast_id))
        .await?;

    tracing::debug!(
        user_id = %auth.user_id(),
        podcast_id = %subscription.podcast.id,
        "Subscribed"
    );

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// DELETE /api/subscriptions/:podcast_id
pub async fn unsubscribe(
    Path(podcast_id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage_for(&auth)
        .unsubscribe(PodcastId::new(podcast_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
