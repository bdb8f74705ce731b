/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::{Method, StatusCode};
use common::{field_list, positions, TestApp};
use podshelf_server::config::ServerConfig;
use serde_json::json;

/// Test GET /api/health needs no key
#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Test protected routes reject missing and unknown keys
#[tokio::test]
async fn test_queue_requires_api_key() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/queue", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = app.get("/api/queue", "psk_not_a_real_key").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Test GET /api/me resolves the key without echoing it
#[tokio::test]
async fn test_me_returns_identity() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;

    let (status, body) = app.get("/api/me", &user.api_key).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "listener@example.com");
    assert_eq!(body["id"], user.id.as_str());
    assert!(body.get("api_key").is_none());
}

/// Test feed import then browsing podcasts and episodes
#[tokio::test]
async fn test_import_and_browse() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;

    let feed = json!({
        "podcast": {
            "feed_url": "https://feeds.example.com/rust.xml",
            "title": "Rust Weekly"
        },
        "episodes": [
            {"guid": "a", "title": "First", "audio_url": "https://cdn.example.com/a.mp3"},
            {"guid": "b", "title": "Second", "audio_url": "https://cdn.example.com/b.mp3"}
        ]
    });

    let (status, summary) = app.post("/api/podcasts", &user.api_key, feed.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(summary["inserted"], 2);
    assert_eq!(summary["skipped"], 0);

    // Re-importing the same feed skips known guids
    let (_, summary) = app.post("/api/podcasts", &user.api_key, feed).await;
    assert_eq!(summary["inserted"], 0);
    assert_eq!(summary["skipped"], 2);

    let podcast_id = summary["podcast"]["id"].as_str().unwrap().to_string();

    let (status, podcasts) = app.get("/api/podcasts", &user.api_key).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(podcasts.as_array().unwrap().len(), 1);

    let (status, episodes) = app
        .get(&format!("/api/podcasts/{podcast_id}/episodes"), &user.api_key)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes.as_array().unwrap().len(), 2);

    let episode_id = episodes[0]["id"].as_str().unwrap();
    let (status, episode) = app
        .get(&format!("/api/episodes/{episode_id}"), &user.api_key)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(episode["podcast_id"], podcast_id.as_str());

    let (status, body) = app.get("/api/podcasts/missing", &user.api_key).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

/// Test malformed and invalid bodies get the structured 400 payload
#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;

    // Unknown field
    let (status, body) = app
        .post("/api/queue", &user.api_key, json!({"episode": "x"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["error"].is_string());

    // Negative position
    let (status, body) = app
        .post(
            "/api/queue",
            &user.api_key,
            json!({"episode_id": "x", "position": -1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    // Both references on a playlist item
    let (_, playlist) = app
        .post("/api/playlists", &user.api_key, json!({"name": "Mix"}))
        .await;
    let playlist_id = playlist["id"].as_str().unwrap();
    let (status, _) = app
        .post(
            &format!("/api/playlists/{playlist_id}/items"),
            &user.api_key,
            json!({"podcast_id": "p", "episode_id": "e"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank playlist name
    let (status, _) = app
        .post("/api/playlists", &user.api_key, json!({"name": "   "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Test subscribe / duplicate / unsubscribe
#[tokio::test]
async fn test_subscriptions() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;
    let (podcast_id, _) = app.create_podcast("Rust Weekly", 1).await;

    let body = json!({"podcast_id": podcast_id.as_str()});
    let (status, subscription) = app.post("/api/subscriptions", &user.api_key, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["podcast"]["title"], "Rust Weekly");

    let (status, error) = app.post("/api/subscriptions", &user.api_key, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "conflict");

    let (_, list) = app.get("/api/subscriptions", &user.api_key).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/subscriptions/{podcast_id}");
    let (status, _) = app.delete(&uri, &user.api_key).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete(&uri, &user.api_key).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test queue ordering over HTTP: append, move C to front, remove, reorder, clear
#[tokio::test]
async fn test_queue_ordering() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;
    let (_, episodes) = app.create_podcast("Rust Weekly", 3).await;
    let key = user.api_key.as_str();

    let mut queue = serde_json::Value::Null;
    for episode_id in &episodes {
        let (status, body) = app
            .post("/api/queue", key, json!({"episode_id": episode_id.as_str()}))
            .await;
        assert_eq!(status, StatusCode::OK);
        queue = body;
    }
    assert_eq!(positions(&queue), vec![0, 1, 2]);

    // [A, B, C] -> move C to 0 -> [C, A, B]
    let ids = field_list(&queue, "id");
    let (status, queue) = app
        .put(&format!("/api/queue/{}", ids[2]), key, json!({"position": 0}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field_list(&queue, "episode_id"),
        vec![
            episodes[2].to_string(),
            episodes[0].to_string(),
            episodes[1].to_string()
        ]
    );
    assert_eq!(positions(&queue), vec![0, 1, 2]);

    // Duplicate enqueue conflicts
    let (status, _) = app
        .post("/api/queue", key, json!({"episode_id": episodes[0].as_str()}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Out-of-range move is a validation error
    let (status, _) = app
        .put(&format!("/api/queue/{}", ids[0]), key, json!({"position": 3}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Remove the head -> [A, B]
    let head = field_list(&queue, "id")[0].clone();
    let (status, queue) = app.delete(&format!("/api/queue/{head}"), key).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(positions(&queue), vec![0, 1]);

    // Batch reorder must list every item
    let ids = field_list(&queue, "id");
    let (status, _) = app
        .put(
            "/api/queue",
            key,
            json!({"items": [{"id": ids[0], "position": 0}]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, queue) = app
        .put(
            "/api/queue",
            key,
            json!({"items": [
                {"id": ids[0], "position": 1},
                {"id": ids[1], "position": 0}
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field_list(&queue, "id"), vec![ids[1].clone(), ids[0].clone()]);

    let (status, _) = app.delete("/api/queue", key).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, queue) = app.get("/api/queue", key).await;
    assert!(queue.as_array().unwrap().is_empty());
}

/// Test play-next inserts after the current episode
#[tokio::test]
async fn test_play_next() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;
    let (_, episodes) = app.create_podcast("Rust Weekly", 3).await;
    let key = user.api_key.as_str();

    for episode_id in &episodes[..2] {
        app.post("/api/queue", key, json!({"episode_id": episode_id.as_str()}))
            .await;
    }

    let (status, queue) = app
        .post(
            "/api/queue/play-next",
            key,
            json!({
                "episode_id": episodes[2].as_str(),
                "current_episode_id": episodes[0].as_str()
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field_list(&queue, "episode_id"),
        vec![
            episodes[0].to_string(),
            episodes[2].to_string(),
            episodes[1].to_string()
        ]
    );
}

/// Test other users cannot touch a queue item or playlist
#[tokio::test]
async fn test_cross_user_access_is_forbidden() {
    let app = TestApp::new().await;
    let alice = app.create_user("alice@example.com").await;
    let bob = app.create_user("bob@example.com").await;
    let (_, episodes) = app.create_podcast("Rust Weekly", 1).await;

    let (_, queue) = app
        .post(
            "/api/queue",
            &alice.api_key,
            json!({"episode_id": episodes[0].as_str()}),
        )
        .await;
    let item_id = field_list(&queue, "id")[0].clone();

    let (status, body) = app
        .delete(&format!("/api/queue/{item_id}"), &bob.api_key)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (_, playlist) = app
        .post("/api/playlists", &alice.api_key, json!({"name": "Mine"}))
        .await;
    let playlist_id = playlist["id"].as_str().unwrap();

    let (status, _) = app
        .get(&format!("/api/playlists/{playlist_id}"), &bob.api_key)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/playlists/{playlist_id}"), &bob.api_key)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

/// Test playlist lifecycle: create, add mixed items, remove head, update, delete
#[tokio::test]
async fn test_playlist_lifecycle() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;
    let (podcast_id, episodes) = app.create_podcast("Rust Weekly", 1).await;
    let key = user.api_key.as_str();

    let (status, playlist) = app
        .post(
            "/api/playlists",
            key,
            json!({"name": "Commute", "description": "Short stuff"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist_id = playlist["id"].as_str().unwrap().to_string();
    let items_uri = format!("/api/playlists/{playlist_id}/items");

    app.post(&items_uri, key, json!({"episode_id": episodes[0].as_str()}))
        .await;
    let (status, items) = app
        .post(&items_uri, key, json!({"podcast_id": podcast_id.as_str()}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(positions(&items), vec![0, 1]);
    assert_eq!(items[0]["item"]["kind"], "episode");
    assert_eq!(items[1]["item"]["kind"], "podcast");

    // Same podcast twice conflicts
    let (status, _) = app
        .post(&items_uri, key, json!({"podcast_id": podcast_id.as_str()}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // [A@0, B@1] remove A -> [B@0]
    let first = field_list(&items, "id")[0].clone();
    let (status, items) = app.delete(&format!("{items_uri}/{first}"), key).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(positions(&items), vec![0]);
    assert_eq!(items[0]["item"]["kind"], "podcast");

    let (status, updated) = app
        .put(
            &format!("/api/playlists/{playlist_id}"),
            key,
            json!({"name": "Morning Commute"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Morning Commute");
    assert_eq!(updated["description"], "Short stuff");

    let (_, fetched) = app.get(&format!("/api/playlists/{playlist_id}"), key).await;
    assert_eq!(fetched["items"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/api/playlists/{playlist_id}"), key)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/playlists/{playlist_id}"), key).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test progress reporting, sessions, completion, history and reset
#[tokio::test]
async fn test_progress_flow() {
    let app = TestApp::new().await;
    let user = app.create_user("listener@example.com").await;
    let (_, episodes) = app.create_podcast("Rust Weekly", 2).await;
    let key = user.api_key.as_str();
    let progress_uri = format!("/api/episodes/{}/progress", episodes[0]);

    let (status, body) = app.get(&progress_uri, key).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    app.put(
        &progress_uri,
        key,
        json!({"position_seconds": 100.0, "duration_seconds": 1800.0}),
    )
    .await;

    let (_, record) = app
        .put(&progress_uri, key, json!({"position_seconds": 108.0}))
        .await;
    assert_eq!(record["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(record["duration_seconds"], 1800.0);

    let (_, record) = app
        .put(&progress_uri, key, json!({"position_seconds": 110.0}))
        .await;
    assert_eq!(record["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(record["position_seconds"], 110.0);

    let (status, record) = app
        .post(
            &format!("/api/episodes/{}/completed", episodes[1]),
            key,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["completed"], true);

    let (status, history) = app.get("/api/history?limit=1", key).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["episode_id"], episodes[1].as_str());

    let (status, _) = app.get("/api/history?limit=0", key).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&progress_uri, key).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.delete(&progress_uri, key).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            "/api/episodes/missing/progress",
            key,
            json!({"position_seconds": 1.0}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test the configured session window applies to stored records
#[tokio::test]
async fn test_configured_session_cap() {
    let mut config = ServerConfig::default();
    config.progress.max_sessions = 1;
    let app = TestApp::with_config(config).await;
    let user = app.create_user("listener@example.com").await;
    let (_, episodes) = app.create_podcast("Rust Weekly", 1).await;
    let progress_uri = format!("/api/episodes/{}/progress", episodes[0]);

    let mut record = serde_json::Value::Null;
    for position in [0.0, 30.0, 60.0, 90.0] {
        let (_, body) = app
            .put(&progress_uri, &user.api_key, json!({"position_seconds": position}))
            .await;
        record = body;
    }

    let sessions = record["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["position_start"], 60.0);
}
