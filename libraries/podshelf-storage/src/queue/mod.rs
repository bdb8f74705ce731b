//! Per-user play queue
//!
//! Every mutation runs in one transaction and returns the queue in its new
//! order. Positions are maintained by [`crate::positions::QUEUE_ITEMS`].

use crate::begin_write;
use crate::podcasts;
use crate::positions::QUEUE_ITEMS;
use crate::time::{from_millis, now_millis};
use podshelf_core::{
    ordering, EpisodeId, PodError, QueueItem, QueueItemId, Reorder, Result, UserId,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

fn map_item(row: &SqliteRow) -> QueueItem {
    QueueItem {
        id: row.get("id"),
        user_id: row.get("user_id"),
        episode_id: row.get("episode_id"),
        position: row.get("position"),
        added_at: from_millis(row.get("added_at")),
        episode_title: row.get("episode_title"),
        podcast_id: row.get("podcast_id"),
    }
}

/// Get a user's queue in play order
pub async fn get_all(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<QueueItem>> {
    let rows = sqlx::query(
        r#"
        SELECT q.id, q.user_id, q.episode_id, q.position, q.added_at,
               e.title AS episode_title, e.podcast_id
        FROM queue_items q
        LEFT JOIN episodes e ON e.id = q.episode_id
        WHERE q.user_id = ?
        ORDER BY q.position
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_item).collect())
}

/// Add an episode to the queue
///
/// Appends when `position` is `None`, otherwise inserts at `position`
/// (`0..=len`) and shifts later items back.
pub async fn enqueue(
    pool: &SqlitePool,
    user_id: &UserId,
    episode_id: &EpisodeId,
    position: Option<i64>,
) -> Result<Vec<QueueItem>> {
    let mut tx = begin_write(pool).await?;

    podcasts::require_episode(&mut tx, episode_id).await?;

    if find_by_episode(&mut tx, user_id, episode_id).await?.is_some() {
        return Err(PodError::duplicate(format!(
            "episode {episode_id} is already queued"
        )));
    }

    let target = match position {
        Some(position) => position,
        None => ordering::append_position(QUEUE_ITEMS.len(&mut tx, user_id.as_str()).await?),
    };

    QUEUE_ITEMS
        .make_room(&mut tx, user_id.as_str(), target)
        .await?;
    insert(&mut tx, user_id, episode_id, target).await?;

    tx.commit().await?;

    get_all(pool, user_id).await
}

/// Queue an episode to play right after the current one
///
/// An episode already in the queue is taken out first. Without a current
/// episode (or when it is not queued) the episode goes to the front.
pub async fn play_next(
    pool: &SqlitePool,
    user_id: &UserId,
    episode_id: &EpisodeId,
    current_episode_id: Option<&EpisodeId>,
) -> Result<Vec<QueueItem>> {
    let mut tx = begin_write(pool).await?;

    podcasts::require_episode(&mut tx, episode_id).await?;

    if let Some((item_id, position)) = find_by_episode(&mut tx, user_id, episode_id).await? {
        QUEUE_ITEMS
            .detach(&mut tx, user_id.as_str(), item_id.as_str(), position)
            .await?;
    }

    let current_position = match current_episode_id {
        Some(current) => find_by_episode(&mut tx, user_id, current)
            .await?
            .map(|(_, position)| position),
        None => None,
    };
    let target = ordering::play_next_position(current_position);

    QUEUE_ITEMS
        .make_room(&mut tx, user_id.as_str(), target)
        .await?;
    insert(&mut tx, user_id, episode_id, target).await?;

    tx.commit().await?;

    get_all(pool, user_id).await
}

/// Move one queue item to `new_position`
pub async fn move_item(
    pool: &SqlitePool,
    user_id: &UserId,
    item_id: &QueueItemId,
    new_position: i64,
) -> Result<Vec<QueueItem>> {
    let mut tx = begin_write(pool).await?;

    let position = owned_position(&mut tx, user_id, item_id).await?;
    QUEUE_ITEMS
        .move_to(
            &mut tx,
            user_id.as_str(),
            item_id.as_str(),
            position,
            new_position,
        )
        .await?;

    tx.commit().await?;

    get_all(pool, user_id).await
}

/// Replace every queue position at once
///
/// `order` must list each of the user's queue items exactly once with
/// positions `0..len`; anything else is rejected without changes.
pub async fn reorder(
    pool: &SqlitePool,
    user_id: &UserId,
    order: &[Reorder<QueueItemId>],
) -> Result<Vec<QueueItem>> {
    let mut tx = begin_write(pool).await?;

    for entry in order {
        owned_position(&mut tx, user_id, &entry.id).await?;
    }

    let order: Vec<Reorder<String>> = order
        .iter()
        .map(|entry| Reorder::new(entry.id.as_str().to_string(), entry.position))
        .collect();
    QUEUE_ITEMS
        .reorder(&mut tx, user_id.as_str(), &order)
        .await?;

    tx.commit().await?;

    get_all(pool, user_id).await
}

/// Remove one queue item and close the gap
pub async fn remove(
    pool: &SqlitePool,
    user_id: &UserId,
    item_id: &QueueItemId,
) -> Result<Vec<QueueItem>> {
    let mut tx = begin_write(pool).await?;

    let position = owned_position(&mut tx, user_id, item_id).await?;
    QUEUE_ITEMS
        .detach(&mut tx, user_id.as_str(), item_id.as_str(), position)
        .await?;

    tx.commit().await?;

    get_all(pool, user_id).await
}

/// Empty a user's queue
pub async fn clear(pool: &SqlitePool, user_id: &UserId) -> Result<()> {
    sqlx::query("DELETE FROM queue_items WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

// Helper functions

/// Current position of a queue item the user owns
async fn owned_position(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    item_id: &QueueItemId,
) -> Result<i64> {
    let placement = QUEUE_ITEMS
        .locate(conn, item_id.as_str())
        .await?
        .ok_or_else(|| PodError::not_found("Queue item", item_id.as_str()))?;

    if placement.owner != user_id.as_str() {
        return Err(PodError::PermissionDenied);
    }

    Ok(placement.position)
}

async fn find_by_episode(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    episode_id: &EpisodeId,
) -> Result<Option<(QueueItemId, i64)>> {
    let row = sqlx::query("SELECT id, position FROM queue_items WHERE user_id = ? AND episode_id = ?")
        .bind(user_id)
        .bind(episode_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(|row| (row.get("id"), row.get("position"))))
}

async fn insert(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    episode_id: &EpisodeId,
    position: i64,
) -> Result<QueueItemId> {
    let id = QueueItemId::generate();

    sqlx::query(
        "INSERT INTO queue_items (id, user_id, episode_id, position, added_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(episode_id)
    .bind(position)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    Ok(id)
}
