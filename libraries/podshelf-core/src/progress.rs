//! Listening-progress session recorder
//!
//! Players report their position frequently (every timeupdate). Small steps
//! only move the stored position; a jump larger than the session threshold
//! since the last save closes a [`ListeningSession`] spanning the previous
//! checkpoint to now.

use crate::types::{EpisodeId, ListeningProgress, ListeningSession, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position jump (seconds) above which a session delta is recorded
pub const DEFAULT_SESSION_THRESHOLD_SECONDS: f64 = 5.0;

/// Sessions kept per record before the oldest are dropped
pub const DEFAULT_MAX_SESSIONS: usize = 500;

/// Tuning for the session recorder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPolicy {
    /// Strictly-greater-than threshold for appending a session
    pub session_threshold_seconds: f64,
    /// Rolling window size of the session list
    pub max_sessions: usize,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            session_threshold_seconds: DEFAULT_SESSION_THRESHOLD_SECONDS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// A position report from a player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub position_seconds: f64,
    /// `None` keeps the stored duration
    pub duration_seconds: Option<f64>,
    /// `None` keeps the stored completion flag
    pub completed: Option<bool>,
}

/// Apply `update` to the existing record (if any) and return the new record
pub fn record_progress(
    existing: Option<ListeningProgress>,
    user_id: &UserId,
    episode_id: &EpisodeId,
    update: &ProgressUpdate,
    now: DateTime<Utc>,
    policy: &ProgressPolicy,
) -> ListeningProgress {
    let Some(mut record) = existing else {
        return ListeningProgress {
            user_id: user_id.clone(),
            episode_id: episode_id.clone(),
            position_seconds: update.position_seconds,
            duration_seconds: update.duration_seconds,
            completed: update.completed.unwrap_or(false),
            sessions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
    };

    let jump = (record.position_seconds - update.position_seconds).abs();
    if jump > policy.session_threshold_seconds {
        record.sessions.push(ListeningSession {
            start_time: record.updated_at,
            end_time: now,
            position_start: record.position_seconds,
            position_end: update.position_seconds,
        });
        trim_sessions(&mut record.sessions, policy.max_sessions);
    }

    record.position_seconds = update.position_seconds;
    if let Some(duration) = update.duration_seconds {
        record.duration_seconds = Some(duration);
    }
    if let Some(completed) = update.completed {
        record.completed = completed;
    }
    record.updated_at = now;

    record
}

/// Drop the oldest sessions so at most `max` remain
fn trim_sessions(sessions: &mut Vec<ListeningSession>, max: usize) {
    if sessions.len() > max {
        let excess = sessions.len() - max;
        sessions.drain(..excess);
    }
}
