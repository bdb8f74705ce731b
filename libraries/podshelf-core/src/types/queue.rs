//! Play queue types

use super::ids::{EpisodeId, PodcastId, QueueItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a user's play queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    pub user_id: UserId,
    pub episode_id: EpisodeId,
    /// Zero-based, dense within the user's queue
    pub position: i64,
    pub added_at: DateTime<Utc>,

    /// Denormalized fields for display
    pub episode_title: Option<String>,
    pub podcast_id: Option<PodcastId>,
}

/// Requested position for one item of a batch reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reorder<Id> {
    pub id: Id,
    pub position: i64,
}

impl<Id> Reorder<Id> {
    pub fn new(id: Id, position: i64) -> Self {
        Self { id, position }
    }
}
