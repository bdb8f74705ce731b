/// API-key authentication middleware
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use podshelf_core::{User, UserId};

/// Extension type to store the resolved caller in the request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Middleware that resolves the bearer API key to a user
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let api_key = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ServerError::Auth("missing bearer API key".to_string()))?;

    let user = podshelf_storage::users::find_by_api_key(&app_state.pool, api_key)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Rejected unknown API key");
            ServerError::Auth("invalid API key".to_string())
        })?;

    tracing::debug!(user_id = %user.id, "Authenticated request");

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
