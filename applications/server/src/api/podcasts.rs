/// Podcasts and episodes API routes
use crate::{
    error::{Result, ServerError},
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
    types::{Episode, EpisodeId, ImportFeed, ImportSummary, NewEpisode, NewPodcast, Podcast, PodcastId},
    PodError,
};
use serde::Deserialize;

/// A feed already parsed by the ingestion side
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportFeedRequest {
    pub podcast: NewPodcast,
    #[serde(default)]
    pub episodes: Vec<NewEpisode>,
}

impl Validate for ImportFeedRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        require_non_blank("podcast.feed_url", &self.podcast.feed_url)?;
        require_non_blank("podcast.title", &self.podcast.title)?;

        for episode in &self.episodes {
            require_non_blank("episodes[].guid", &episode.guid)?;
            require_non_blank("episodes[].title", &episode.title)?;
            require_non_blank("episodes[].audio_url", &episode.audio_url)?;
            if episode.duration_seconds.is_some_and(|d| !d.is_finite() || d < 0.0) {
                return Err(format!(
                    "episode {} has an invalid duration",
                    episode.guid
                ));
            }
        }

        Ok(())
    }
}

/// GET /api/podcasts
pub async fn list_podcasts(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Podcast>>> {
    let podcasts = app_state.storage_for(&auth).get_all_podcasts().await?;
    Ok(Json(podcasts))
}

/// POST /api/podcasts
/// Store a parsed feed; episodes with a known guid are skipped
pub async fn import_feed(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<ImportFeedRequest>,
) -> Result<(StatusCode, Json<ImportSummary>)> {
    let summary = app_state
        .storage_for(&auth)
        .import_feed(ImportFeed {
            podcast: req.podcast,
            episodes: req.episodes,
        })
        .await?;

    tracing::info!(
        podcast_id = %summary.podcast.id,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Imported feed"
    );

    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/podcasts/:id
pub async fn get_podcast(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Podcast>> {
    let podcast = app_state
        .storage_for(&auth)
        .get_podcast(PodcastId::new(id.clone()))
        .await?
        .ok_or_else(|| ServerError::from(PodError::not_found("Podcast", id)))?;

    Ok(Json(podcast))
}

/// GET /api/podcasts/:id/episodes
/// Newest first
pub async fn list_episodes(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Episode>>> {
    let episodes = app_state
        .storage_for(&auth)
        .get_podcast_episodes(PodcastId::new(id))
        .await?;

    Ok(Json(episodes))
}

/// GET /api/episodes/:id
pub async fn get_episode(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Episode>> {
    let episode = app_state
        .storage_for(&auth)
        .get_episode(EpisodeId::new(id.clone()))
        .await?
        .ok_or_else(|| ServerError::from(PodError::not_found("Episode", id)))?;

    Ok(Json(episode))
}
