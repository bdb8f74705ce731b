//! User records and API-key lookup
//!
//! Keys are issued by the CLI; there is no password or session handling here.

use crate::time::{from_millis, now_millis};
use crate::error::{Result, StorageError};
use podshelf_core::{User, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

fn map_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        api_key: row.get("api_key"),
        created_at: from_millis(row.get("created_at")),
    }
}

/// Generate a fresh API key
fn generate_api_key() -> String {
    format!("psk_{}", Uuid::new_v4().simple())
}

/// Create a user with a freshly generated API key
pub async fn create(pool: &SqlitePool, email: &str) -> Result<User> {
    let existing = sqlx::query("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(StorageError::Conflict(format!("user {email}")));
    }

    let id = UserId::generate();
    sqlx::query("INSERT INTO users (id, email, api_key, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(generate_api_key())
        .bind(now_millis())
        .execute(pool)
        .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, api_key, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_user))
}

/// Resolve a bearer API key to its user
pub async fn find_by_api_key(pool: &SqlitePool, api_key: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, api_key, created_at FROM users WHERE api_key = ?")
        .bind(api_key)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_user))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, email, api_key, created_at FROM users ORDER BY email")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(map_user).collect())
}
