/// Identity API route
use crate::middleware::AuthenticatedUser;
use axum::Json;
use podshelf_core::User;

/// GET /api/me
/// The user the bearer API key resolved to (the key itself is never echoed)
pub async fn get_me(auth: AuthenticatedUser) -> Json<User> {
    Json(auth.user().clone())
}
