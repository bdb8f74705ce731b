use crate::begin_write;
use crate::podcasts;
use crate::time::{from_millis, now_millis};
use podshelf_core::{PodError, Podcast, PodcastId, Result, Subscription, UserId};
use sqlx::{Row, SqlitePool};

/// Get a user's subscriptions, alphabetically by podcast title
pub async fn get_all(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Subscription>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.feed_url, p.title, p.author, p.description, p.image_url,
               p.created_at, p.updated_at, s.created_at AS subscribed_at
        FROM subscriptions s
        INNER JOIN podcasts p ON p.id = s.podcast_id
        WHERE s.user_id = ?
        ORDER BY p.title COLLATE NOCASE
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Subscription {
            podcast: Podcast {
                id: row.get("id"),
                feed_url: row.get("feed_url"),
                title: row.get("title"),
                author: row.get("author"),
                description: row.get("description"),
                image_url: row.get("image_url"),
                created_at: from_millis(row.get("created_at")),
                updated_at: from_millis(row.get("updated_at")),
            },
            subscribed_at: from_millis(row.get("subscribed_at")),
        })
        .collect())
}

/// Subscribe a user to a podcast
pub async fn subscribe(
    pool: &SqlitePool,
    user_id: &UserId,
    podcast_id: &PodcastId,
) -> Result<Subscription> {
    let mut tx = begin_write(pool).await?;

    let podcast = podcasts::require_podcast(&mut tx, podcast_id).await?;

    let existing = sqlx::query("SELECT 1 AS found FROM subscriptions WHERE user_id = ? AND podcast_id = ?")
        .bind(user_id)
        .bind(podcast_id)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(PodError::duplicate(format!(
            "already subscribed to podcast {podcast_id}"
        )));
    }

    let now = now_millis();
    sqlx::query("INSERT INTO subscriptions (user_id, podcast_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(podcast_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Subscription {
        podcast,
        subscribed_at: from_millis(now),
    })
}

/// Unsubscribe a user from a podcast
pub async fn unsubscribe(pool: &SqlitePool, user_id: &UserId, podcast_id: &PodcastId) -> Result<()> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND podcast_id = ?")
        .bind(user_id)
        .bind(podcast_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PodError::not_found("Subscription", podcast_id.as_str()));
    }

    Ok(())
}
