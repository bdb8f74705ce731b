//! Listening history: one progress record per (user, episode)
//!
//! Session bookkeeping is decided by [`podshelf_core::progress::record_progress`];
//! this slice only loads and stores the record inside a transaction.

use crate::begin_write;
use crate::podcasts;
use crate::time::{from_millis, to_millis};
use chrono::Utc;
use podshelf_core::progress::{self, ProgressPolicy, ProgressUpdate};
use podshelf_core::{EpisodeId, ListeningProgress, PodError, Result, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

const PROGRESS_COLUMNS: &str = "user_id, episode_id, position_seconds, duration_seconds, \
     completed, sessions_json, created_at, updated_at";

fn map_progress(row: &SqliteRow) -> Result<ListeningProgress> {
    let sessions_json: String = row.get("sessions_json");

    Ok(ListeningProgress {
        user_id: row.get("user_id"),
        episode_id: row.get("episode_id"),
        position_seconds: row.get("position_seconds"),
        duration_seconds: row.get("duration_seconds"),
        completed: row.get::<i64, _>("completed") != 0,
        sessions: serde_json::from_str(&sessions_json)?,
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
    })
}

/// Get a user's progress on an episode
pub async fn get(
    pool: &SqlitePool,
    user_id: &UserId,
    episode_id: &EpisodeId,
) -> Result<Option<ListeningProgress>> {
    let mut conn = pool.acquire().await?;
    find(&mut conn, user_id, episode_id).await
}

/// Record a position report
pub async fn record(
    pool: &SqlitePool,
    user_id: &UserId,
    episode_id: &EpisodeId,
    update: &ProgressUpdate,
    policy: &ProgressPolicy,
) -> Result<ListeningProgress> {
    let mut tx = begin_write(pool).await?;

    podcasts::require_episode(&mut tx, episode_id).await?;

    let existing = find(&mut tx, user_id, episode_id).await?;
    let record = progress::record_progress(existing, user_id, episode_id, update, Utc::now(), policy);
    upsert(&mut tx, &record).await?;

    tx.commit().await?;

    Ok(record)
}

/// Flag an episode as completed, keeping the stored position
pub async fn mark_completed(
    pool: &SqlitePool,
    user_id: &UserId,
    episode_id: &EpisodeId,
    policy: &ProgressPolicy,
) -> Result<ListeningProgress> {
    let mut tx = begin_write(pool).await?;

    podcasts::require_episode(&mut tx, episode_id).await?;

    let existing = find(&mut tx, user_id, episode_id).await?;
    let update = ProgressUpdate {
        position_seconds: existing.as_ref().map_or(0.0, |p| p.position_seconds),
        duration_seconds: None,
        completed: Some(true),
    };
    let record = progress::record_progress(existing, user_id, episode_id, &update, Utc::now(), policy);
    upsert(&mut tx, &record).await?;

    tx.commit().await?;

    Ok(record)
}

/// Forget a user's progress on an episode
pub async fn reset(pool: &SqlitePool, user_id: &UserId, episode_id: &EpisodeId) -> Result<()> {
    let result = sqlx::query("DELETE FROM listening_history WHERE user_id = ? AND episode_id = ?")
        .bind(user_id)
        .bind(episode_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PodError::not_found("Listening progress", episode_id.as_str()));
    }

    Ok(())
}

/// Most recently updated progress records
pub async fn get_recent(pool: &SqlitePool, user_id: &UserId, limit: i64) -> Result<Vec<ListeningProgress>> {
    let sql = format!(
        "SELECT {PROGRESS_COLUMNS} FROM listening_history WHERE user_id = ? \
         ORDER BY updated_at DESC LIMIT ?"
    );
    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_progress).collect()
}

// Helper functions

async fn find(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    episode_id: &EpisodeId,
) -> Result<Option<ListeningProgress>> {
    let sql = format!(
        "SELECT {PROGRESS_COLUMNS} FROM listening_history WHERE user_id = ? AND episode_id = ?"
    );
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(episode_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(map_progress).transpose()
}

async fn upsert(conn: &mut SqliteConnection, record: &ListeningProgress) -> Result<()> {
    let sessions_json = serde_json::to_string(&record.sessions)?;

    sqlx::query(
        r#"
        INSERT INTO listening_history
            (user_id, episode_id, position_seconds, duration_seconds, completed,
             sessions_json, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, episode_id)
        DO UPDATE SET
            position_seconds = excluded.position_seconds,
            duration_seconds = excluded.duration_seconds,
            completed = excluded.completed,
            sessions_json = excluded.sessions_json,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&record.user_id)
    .bind(&record.episode_id)
    .bind(record.position_seconds)
    .bind(record.duration_seconds)
    .bind(i64::from(record.completed))
    .bind(sessions_json)
    .bind(to_millis(record.created_at))
    .bind(to_millis(record.updated_at))
    .execute(&mut *conn)
    .await?;

    Ok(())
}
