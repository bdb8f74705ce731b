/// API route modules
pub mod health;
pub mod me;
pub mod playlists;
pub mod podcasts;
pub mod progress;
pub mod queue;
pub mod subscriptions;

use crate::{extract::Validate, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Body of a single-item move
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveRequest {
    pub position: i64,
}

impl Validate for MoveRequest {
    fn validate(&self) -> Result<(), String> {
        crate::extract::require_position("position", Some(self.position))
    }
}

/// One entry of a batch reorder
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderEntry {
    pub id: String,
    pub position: i64,
}

/// Body of a batch reorder: every item of the list with its new position
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderRequest {
    pub items: Vec<ReorderEntry>,
}

impl Validate for ReorderRequest {
    fn validate(&self) -> Result<(), String> {
        for entry in &self.items {
            crate::extract::require_non_blank("items[].id", &entry.id)?;
            crate::extract::require_position("items[].position", Some(entry.position))?;
        }
        Ok(())
    }
}

/// Build the full `/api` router
pub fn router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health::health));

    // Protected routes (API key required)
    let protected_routes = Router::new()
        .route("/me", get(me::get_me))
        // Podcasts & episodes
        .route(
            "/podcasts",
            get(podcasts::list_podcasts).post(podcasts::import_feed),
        )
        .route("/podcasts/:id", get(podcasts::get_podcast))
        .route("/podcasts/:id/episodes", get(podcasts::list_episodes))
        .route("/episodes/:id", get(podcasts::get_episode))
        // Subscriptions
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions).post(subscriptions::subscribe),
        )
        .route(
            "/subscriptions/:podcast_id",
            axum::routing::delete(subscriptions::unsubscribe),
        )
        // Queue
        .route(
            "/queue",
            get(queue::get_queue)
                .post(queue::enqueue)
                .put(queue::reorder_queue)
                .delete(queue::clear_queue),
        )
        .route("/queue/play-next", post(queue::play_next))
        .route(
            "/queue/:id",
            put(queue::move_queue_item).delete(queue::remove_queue_item),
        )
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route(
            "/playlists/:id/items",
            post(playlists::add_item).put(playlists::reorder_items),
        )
        .route(
            "/playlists/:id/items/:item_id",
            put(playlists::move_item).delete(playlists::remove_item),
        )
        // Listening history
        .route("/history", get(progress::recent_history))
        .route(
            "/episodes/:id/progress",
            get(progress::get_progress)
                .put(progress::record_progress)
                .delete(progress::reset_progress),
        )
        .route("/episodes/:id/completed", post(progress::mark_completed))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
