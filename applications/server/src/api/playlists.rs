/// Playlists API routes
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
    types::{
        CreatePlaylist, EpisodeId, Playlist, PlaylistId, PlaylistItem, PlaylistItemId,
        PlaylistItemRef, PodcastId, Reorder, UpdatePlaylist,
    },
};
use serde::Deserialize;

const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreatePlaylistRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlaylistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for UpdatePlaylistRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_none() && self.description.is_none() {
            return Err("nothing to update".to_string());
        }
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

/// Exactly one of `podcast_id` / `episode_id`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddItemRequest {
    #[serde(default)]
    pub podcast_id: Option<String>,
    #[serde(default)]
    pub episode_id: Option<String>,
    /// Insert here instead of appending
    #[serde(default)]
    pub position: Option<i64>,
}

impl AddItemRequest {
    fn item_ref(self) -> podshelf_core::Result<PlaylistItemRef> {
        PlaylistItemRef::from_columns(
            self.podcast_id.map(PodcastId::new),
            self.episode_id.map(EpisodeId::new),
        )
    }
}

impl Validate for AddItemRequest {
    fn validate(&self) -> std::result::Result<(), String> {
        match (&self.podcast_id, &self.episode_id) {
            (Some(id), None) => require_non_blank("podcast_id", id)?,
            (None, Some(id)) => require_non_blank("episode_id", id)?,
            _ => return Err("exactly one of podcast_id or episode_id is required".to_string()),
        }
        require_position("position", self.position)
    }
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
    require_non_blank("name", name)?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("name must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(())
}

/// GET /api/playlists
/// The caller's own playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state.storage_for(&auth).get_user_playlists().await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .storage_for(&auth)
        .create_playlist(CreatePlaylist {
            name: req.name.trim().to_string(),
            description: req.description,
            owner_id: auth.user_id().clone(),
        })
        .await?;

    tracing::debug!(playlist_id = %playlist.id, "Created playlist");

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Playlist with items in order
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .storage_for(&auth)
        .get_playlist_with_items(PlaylistId::new(id))
        .await?;

    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .storage_for(&auth)
        .update_playlist(
            PlaylistId::new(id),
            UpdatePlaylist {
                name: req.name.map(|name| name.trim().to_string()),
                description: req.description,
            },
        )
        .await?;

    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage_for(&auth)
        .delete_playlist(PlaylistId::new(id.clone()))
        .await?;

    tracing::debug!(playlist_id = %id, "Deleted playlist");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/playlists/:id/items
/// Append a podcast or episode, or insert it at `position`
pub async fn add_item(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<AddItemRequest>,
) -> Result<Json<Vec<PlaylistItem>>> {
    let position = req.position;
    let item = req.item_ref()?;

    let items = app_state
        .storage_for(&auth)
        .add_playlist_item(PlaylistId::new(id), item, position)
        .await?;

    Ok(Json(items))
}

/// PUT /api/playlists/:id/items
/// Replace every item position at once
pub async fn reorder_items(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<ReorderRequest>,
) -> Result<Json<Vec<PlaylistItem>>> {
    let order = req
        .items
        .into_iter()
        .map(|entry| Reorder::new(PlaylistItemId::new(entry.id), entry.position))
        .collect();

    let items = app_state
        .storage_for(&auth)
        .reorder_playlist(PlaylistId::new(id), order)
        .await?;

    Ok(Json(items))
}

/// PUT /api/playlists/:id/items/:item_id
pub async fn move_item(
    Path((id, item_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> Result<Json<Vec<PlaylistItem>>> {
    let items = app_state
        .storage_for(&auth)
        .move_playlist_item(
            PlaylistId::new(id),
            PlaylistItemId::new(item_id),
            req.position,
        )
        .await?;

    Ok(Json(items))
}

/// DELETE /api/playlists/:id/items/:item_id
pub async fn remove_item(
    Path((id, item_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistItem>>> {
    let items = app_state
        .storage_for(&auth)
        .remove_playlist_item(PlaylistId::new(id), PlaylistItemId::new(item_id))
        .await?;

    Ok(Json(items))
}
