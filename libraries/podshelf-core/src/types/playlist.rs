//! Playlist types

use super::ids::{EpisodeId, PlaylistId, PlaylistItemId, PodcastId, UserId};
use crate::error::{PodError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Items in playlist order (populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PlaylistItem>>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}

/// Partial playlist update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// What a playlist item points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PlaylistItemRef {
    Podcast(PodcastId),
    Episode(EpisodeId),
}

impl PlaylistItemRef {
    /// Rebuild a reference from its two nullable columns
    ///
    /// Exactly one column must be set.
    pub fn from_columns(podcast_id: Option<PodcastId>, episode_id: Option<EpisodeId>) -> Result<Self> {
        match (podcast_id, episode_id) {
            (Some(podcast), None) => Ok(Self::Podcast(podcast)),
            (None, Some(episode)) => Ok(Self::Episode(episode)),
            (None, None) => Err(PodError::invalid_input(
                "playlist item must reference a podcast or an episode",
            )),
            (Some(_), Some(_)) => Err(PodError::invalid_input(
                "playlist item cannot reference both a podcast and an episode",
            )),
        }
    }

    /// Split into `(podcast_id, episode_id)` columns
    pub fn columns(&self) -> (Option<&PodcastId>, Option<&EpisodeId>) {
        match self {
            Self::Podcast(id) => (Some(id), None),
            Self::Episode(id) => (None, Some(id)),
        }
    }
}

/// Item in a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: PlaylistItemId,
    pub playlist_id: PlaylistId,
    pub item: PlaylistItemRef,
    /// Zero-based, dense within the playlist
    pub position: i64,
    pub added_at: DateTime<Utc>,

    /// Denormalized title of the referenced podcast or episode
    pub title: Option<String>,
}
