//! Listening history types

use super::ids::{EpisodeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded span of listening between two saved checkpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub position_start: f64,
    pub position_end: f64,
}

/// Listening progress of one user on one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningProgress {
    pub user_id: UserId,
    pub episode_id: EpisodeId,
    /// Current playback position in seconds
    pub position_seconds: f64,
    /// Episode duration as last reported by a player
    pub duration_seconds: Option<f64>,
    pub completed: bool,
    /// Oldest first
    pub sessions: Vec<ListeningSession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
