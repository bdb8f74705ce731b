use crate::begin_write;
use crate::podcasts;
use crate::positions::PLAYLIST_ITEMS;
use crate::time::{from_millis, now_millis};
use podshelf_core::{
    ordering, CreatePlaylist, PlaylistItemRef, PodError, Playlist, PlaylistId, PlaylistItem,
    PlaylistItemId, Reorder, Result, UpdatePlaylist, UserId,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

fn map_playlist(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
        items: None,
    }
}

fn map_item(row: &SqliteRow) -> Result<PlaylistItem> {
    Ok(PlaylistItem {
        id: row.get("id"),
        playlist_id: row.get("playlist_id"),
        item: PlaylistItemRef::from_columns(row.get("podcast_id"), row.get("episode_id"))?,
        position: row.get("position"),
        added_at: from_millis(row.get("added_at")),
        title: row.get("title"),
    })
}

/// Get user's playlists, most recently changed first
pub async fn get_user_playlists(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, description, created_at, updated_at
        FROM playlists
        WHERE owner_id = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_playlist).collect())
}

/// Get playlist with all items
pub async fn get_with_items(
    pool: &SqlitePool,
    id: &PlaylistId,
    user_id: &UserId,
) -> Result<Playlist> {
    let mut conn = pool.acquire().await?;

    let mut playlist = require_owned(&mut conn, id, user_id).await?;
    playlist.items = Some(get_items(&mut conn, id).await?);

    Ok(playlist)
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = now_millis();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&playlist.owner_id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_with_items(pool, &id, &playlist.owner_id).await
}

/// Update playlist name and/or description
pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    update: UpdatePlaylist,
    user_id: &UserId,
) -> Result<Playlist> {
    let mut tx = begin_write(pool).await?;

    let current = require_owned(&mut tx, id, user_id).await?;

    sqlx::query("UPDATE playlists SET name = ?, description = ?, updated_at = ? WHERE id = ?")
        .bind(update.name.unwrap_or(current.name))
        .bind(update.description.or(current.description))
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_with_items(pool, id, user_id).await
}

/// Delete playlist (items cascade)
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<()> {
    let mut tx = begin_write(pool).await?;

    require_owned(&mut tx, id, user_id).await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Add a podcast or episode to a playlist
///
/// Appends when `position` is `None`, otherwise inserts at `position`
/// (`0..=len`) and shifts later items back.
pub async fn add_item(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    item: &PlaylistItemRef,
    position: Option<i64>,
    user_id: &UserId,
) -> Result<Vec<PlaylistItem>> {
    let mut tx = begin_write(pool).await?;

    require_owned(&mut tx, playlist_id, user_id).await?;

    match item {
        PlaylistItemRef::Podcast(id) => {
            podcasts::require_podcast(&mut tx, id).await?;
        }
        PlaylistItemRef::Episode(id) => podcasts::require_episode(&mut tx, id).await?,
    }

    let (podcast_id, episode_id) = item.columns();
    let existing = sqlx::query(
        "SELECT 1 AS found FROM playlist_items WHERE playlist_id = ? AND (podcast_id = ? OR episode_id = ?)",
    )
    .bind(playlist_id)
    .bind(podcast_id)
    .bind(episode_id)
    .fetch_optional(&mut *tx)
    .await?;
    if existing.is_some() {
        return Err(PodError::duplicate("item is already in this playlist"));
    }

    let target = match position {
        Some(position) => position,
        None => ordering::append_position(PLAYLIST_ITEMS.len(&mut tx, playlist_id.as_str()).await?),
    };

    PLAYLIST_ITEMS
        .make_room(&mut tx, playlist_id.as_str(), target)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO playlist_items (id, playlist_id, podcast_id, episode_id, position, added_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(PlaylistItemId::generate())
    .bind(playlist_id)
    .bind(podcast_id)
    .bind(episode_id)
    .bind(target)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;

    touch(&mut tx, playlist_id).await?;
    let items = get_items(&mut tx, playlist_id).await?;

    tx.commit().await?;

    Ok(items)
}

/// Move one item within a playlist
pub async fn move_item(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    item_id: &PlaylistItemId,
    new_position: i64,
    user_id: &UserId,
) -> Result<Vec<PlaylistItem>> {
    let mut tx = begin_write(pool).await?;

    require_owned(&mut tx, playlist_id, user_id).await?;
    let position = item_position(&mut tx, playlist_id, item_id).await?;

    let moved = PLAYLIST_ITEMS
        .move_to(
            &mut tx,
            playlist_id.as_str(),
            item_id.as_str(),
            position,
            new_position,
        )
        .await?;
    if moved {
        touch(&mut tx, playlist_id).await?;
    }
    let items = get_items(&mut tx, playlist_id).await?;

    tx.commit().await?;

    Ok(items)
}

/// Replace every item position of a playlist at once
pub async fn reorder_items(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    order: &[Reorder<PlaylistItemId>],
    user_id: &UserId,
) -> Result<Vec<PlaylistItem>> {
    let mut tx = begin_write(pool).await?;

    require_owned(&mut tx, playlist_id, user_id).await?;
    for entry in order {
        item_position(&mut tx, playlist_id, &entry.id).await?;
    }

    let order: Vec<Reorder<String>> = order
        .iter()
        .map(|entry| Reorder::new(entry.id.as_str().to_string(), entry.position))
        .collect();
    PLAYLIST_ITEMS
        .reorder(&mut tx, playlist_id.as_str(), &order)
        .await?;

    touch(&mut tx, playlist_id).await?;
    let items = get_items(&mut tx, playlist_id).await?;

    tx.commit().await?;

    Ok(items)
}

/// Remove an item from a playlist and close the gap
pub async fn remove_item(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    item_id: &PlaylistItemId,
    user_id: &UserId,
) -> Result<Vec<PlaylistItem>> {
    let mut tx = begin_write(pool).await?;

    require_owned(&mut tx, playlist_id, user_id).await?;
    let position = item_position(&mut tx, playlist_id, item_id).await?;

    PLAYLIST_ITEMS
        .detach(&mut tx, playlist_id.as_str(), item_id.as_str(), position)
        .await?;

    touch(&mut tx, playlist_id).await?;
    let items = get_items(&mut tx, playlist_id).await?;

    tx.commit().await?;

    Ok(items)
}

// Helper functions

/// Load a playlist, failing unless `user_id` owns it
async fn require_owned(
    conn: &mut SqliteConnection,
    id: &PlaylistId,
    user_id: &UserId,
) -> Result<Playlist> {
    let row = sqlx::query(
        "SELECT id, owner_id, name, description, created_at, updated_at FROM playlists WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let playlist = row
        .as_ref()
        .map(map_playlist)
        .ok_or_else(|| PodError::not_found("Playlist", id.as_str()))?;

    if &playlist.owner_id != user_id {
        return Err(PodError::PermissionDenied);
    }

    Ok(playlist)
}

/// Current position of an item that belongs to `playlist_id`
async fn item_position(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    item_id: &PlaylistItemId,
) -> Result<i64> {
    PLAYLIST_ITEMS
        .locate(conn, item_id.as_str())
        .await?
        .filter(|placement| placement.owner == playlist_id.as_str())
        .map(|placement| placement.position)
        .ok_or_else(|| PodError::not_found("Playlist item", item_id.as_str()))
}

async fn get_items(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<Vec<PlaylistItem>> {
    let rows = sqlx::query(
        r#"
        SELECT pi.id, pi.playlist_id, pi.podcast_id, pi.episode_id, pi.position, pi.added_at,
               COALESCE(e.title, p.title) AS title
        FROM playlist_items pi
        LEFT JOIN episodes e ON e.id = pi.episode_id
        LEFT JOIN podcasts p ON p.id = pi.podcast_id
        WHERE pi.playlist_id = ?
        ORDER BY pi.position
        "#,
    )
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(map_item).collect()
}

async fn touch(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(playlist_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
