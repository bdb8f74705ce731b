//! Podcasts and episodes
//!
//! Feed ingestion happens elsewhere; this slice only stores the parsed
//! records it is handed.

use crate::begin_write;
use crate::time::{from_millis, now_millis, to_millis};
use podshelf_core::{
    Episode, EpisodeId, ImportFeed, ImportSummary, NewEpisode, NewPodcast, PodError, Podcast,
    PodcastId, Result,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

const PODCAST_COLUMNS: &str =
    "id, feed_url, title, author, description, image_url, created_at, updated_at";

const EPISODE_COLUMNS: &str = "id, podcast_id, guid, title, description, audio_url, \
     duration_seconds, published_at, created_at";

fn map_podcast(row: &SqliteRow) -> Podcast {
    Podcast {
        id: row.get("id"),
        feed_url: row.get("feed_url"),
        title: row.get("title"),
        author: row.get("author"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
    }
}

fn map_episode(row: &SqliteRow) -> Episode {
    Episode {
        id: row.get("id"),
        podcast_id: row.get("podcast_id"),
        guid: row.get("guid"),
        title: row.get("title"),
        description: row.get("description"),
        audio_url: row.get("audio_url"),
        duration_seconds: row.get("duration_seconds"),
        published_at: row.get::<Option<i64>, _>("published_at").map(from_millis),
        created_at: from_millis(row.get("created_at")),
    }
}

/// Get all podcasts, alphabetically
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Podcast>> {
    let sql = format!("SELECT {PODCAST_COLUMNS} FROM podcasts ORDER BY title COLLATE NOCASE");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    Ok(rows.iter().map(map_podcast).collect())
}

/// Get podcast by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PodcastId) -> Result<Option<Podcast>> {
    let mut conn = pool.acquire().await?;
    find_podcast(&mut conn, id).await
}

/// Get a podcast's episodes, newest first
pub async fn get_episodes(pool: &SqlitePool, podcast_id: &PodcastId) -> Result<Vec<Episode>> {
    if get_by_id(pool, podcast_id).await?.is_none() {
        return Err(PodError::not_found("Podcast", podcast_id.as_str()));
    }

    let sql = format!(
        "SELECT {EPISODE_COLUMNS} FROM episodes WHERE podcast_id = ? \
         ORDER BY published_at IS NULL, published_at DESC, created_at DESC"
    );
    let rows = sqlx::query(&sql).bind(podcast_id).fetch_all(pool).await?;

    Ok(rows.iter().map(map_episode).collect())
}

/// Get episode by ID
pub async fn get_episode(pool: &SqlitePool, id: &EpisodeId) -> Result<Option<Episode>> {
    let sql = format!("SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(map_episode))
}

/// Store a parsed feed
///
/// The podcast is matched on `feed_url` and its metadata refreshed. Episodes
/// whose guid is already stored for the podcast are skipped.
pub async fn import(pool: &SqlitePool, feed: ImportFeed) -> Result<ImportSummary> {
    let mut tx = begin_write(pool).await?;

    let podcast_id = upsert_podcast(&mut tx, &feed.podcast).await?;

    let mut inserted = 0;
    let mut skipped = 0;
    for episode in &feed.episodes {
        if episode_guid_exists(&mut tx, &podcast_id, &episode.guid).await? {
            tracing::info!(
                podcast_id = %podcast_id,
                guid = %episode.guid,
                "Skipping duplicate episode during import"
            );
            skipped += 1;
            continue;
        }

        insert_episode(&mut tx, &podcast_id, episode).await?;
        inserted += 1;
    }

    let podcast = find_podcast(&mut tx, &podcast_id)
        .await?
        .ok_or_else(|| PodError::storage("Failed to retrieve imported podcast"))?;

    tx.commit().await?;

    Ok(ImportSummary {
        podcast,
        inserted,
        skipped,
    })
}

// Helper functions

pub(crate) async fn find_podcast(
    conn: &mut SqliteConnection,
    id: &PodcastId,
) -> Result<Option<Podcast>> {
    let sql = format!("SELECT {PODCAST_COLUMNS} FROM podcasts WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;

    Ok(row.as_ref().map(map_podcast))
}

/// Fail with `NotFound` unless the podcast exists
pub(crate) async fn require_podcast(conn: &mut SqliteConnection, id: &PodcastId) -> Result<Podcast> {
    find_podcast(conn, id)
        .await?
        .ok_or_else(|| PodError::not_found("Podcast", id.as_str()))
}

/// Fail with `NotFound` unless the episode exists
pub(crate) async fn require_episode(conn: &mut SqliteConnection, id: &EpisodeId) -> Result<()> {
    let row = sqlx::query("SELECT 1 AS found FROM episodes WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(_) => Ok(()),
        None => Err(PodError::not_found("Episode", id.as_str())),
    }
}

async fn upsert_podcast(conn: &mut SqliteConnection, podcast: &NewPodcast) -> Result<PodcastId> {
    let now = now_millis();

    let existing = sqlx::query("SELECT id FROM podcasts WHERE feed_url = ?")
        .bind(&podcast.feed_url)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(row) = existing {
        let id: PodcastId = row.get("id");
        sqlx::query(
            r#"
            UPDATE podcasts
            SET title = ?, author = ?, description = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&podcast.title)
        .bind(&podcast.author)
        .bind(&podcast.description)
        .bind(&podcast.image_url)
        .bind(now)
        .bind(&id)
        .execute(&mut *conn)
        .await?;

        return Ok(id);
    }

    let id = PodcastId::generate();
    sqlx::query(
        r#"
        INSERT INTO podcasts (id, feed_url, title, author, description, image_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&podcast.feed_url)
    .bind(&podcast.title)
    .bind(&podcast.author)
    .bind(&podcast.description)
    .bind(&podcast.image_url)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(id)
}

async fn episode_guid_exists(
    conn: &mut SqliteConnection,
    podcast_id: &PodcastId,
    guid: &str,
) -> Result<bool> {
    let row = sqlx::query("SELECT 1 AS found FROM episodes WHERE podcast_id = ? AND guid = ?")
        .bind(podcast_id)
        .bind(guid)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.is_some())
}

async fn insert_episode(
    conn: &mut SqliteConnection,
    podcast_id: &PodcastId,
    episode: &NewEpisode,
) -> Result<EpisodeId> {
    let id = EpisodeId::generate();

    sqlx::query(
        r#"
        INSERT INTO episodes
            (id, podcast_id, guid, title, description, audio_url, duration_seconds, published_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(podcast_id)
    .bind(&episode.guid)
    .bind(&episode.title)
    .bind(&episode.description)
    .bind(&episode.audio_url)
    .bind(episode.duration_seconds)
    .bind(episode.published_at.map(to_millis))
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    Ok(id)
}
