//! Common test utilities and fixtures

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use podshelf_core::types::{EpisodeId, ImportFeed, NewEpisode, NewPodcast, PodcastId, User};
use podshelf_server::{api, config::ServerConfig, state::AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test application backed by a real SQLite file that is removed on drop
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestApp {
    /// Build the full router over a freshly migrated database
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(mut config: ServerConfig) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        config.storage.database_url = db_url.clone();

        let pool = podshelf_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        podshelf_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let router = api::router(AppState::new(pool.clone(), Arc::new(config)));

        Self {
            router,
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Create a user and return it (including its API key)
    pub async fn create_user(&self, email: &str) -> User {
        podshelf_storage::users::create(&self.pool, email)
            .await
            .expect("Failed to create test user")
    }

    /// Import a podcast with `episode_count` episodes, returning episode IDs
    /// ordered by guid
    pub async fn create_podcast(&self, title: &str, episode_count: usize) -> (PodcastId, Vec<EpisodeId>) {
        let feed = ImportFeed {
            podcast: NewPodcast {
                feed_url: format!("https://feeds.example.com/{}.xml", title.replace(' ', "-")),
                title: title.to_string(),
                author: None,
                description: None,
                image_url: None,
            },
            episodes: (0..episode_count)
                .map(|n| NewEpisode {
                    guid: format!("ep-{n}"),
                    title: format!("Episode {n}"),
                    description: None,
                    audio_url: format!("https://cdn.example.com/ep-{n}.mp3"),
                    duration_seconds: Some(1800.0),
                    published_at: None,
                })
                .collect(),
        };

        let summary = podshelf_storage::podcasts::import(&self.pool, feed)
            .await
            .expect("Failed to import test podcast");

        let mut episodes = podshelf_storage::podcasts::get_episodes(&self.pool, &summary.podcast.id)
            .await
            .expect("Failed to load test episodes");
        episodes.sort_by(|a, b| a.guid.cmp(&b.guid));

        (
            summary.podcast.id,
            episodes.into_iter().map(|episode| episode.id).collect(),
        )
    }

    /// Send a request and return the status plus parsed JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, api_key: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(api_key), None).await
    }

    pub async fn post(&self, uri: &str, api_key: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(api_key), Some(body)).await
    }

    pub async fn put(&self, uri: &str, api_key: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(api_key), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, api_key: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(api_key), None).await
    }
}

/// Pull a string field out of every element of a JSON array
pub fn field_list(value: &Value, field: &str) -> Vec<String> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item[field].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Positions of a JSON list of ordered items
pub fn positions(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item["position"].as_i64().unwrap_or(-1))
        .collect()
}
