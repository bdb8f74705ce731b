//! Request body validation
//!
//! Request bodies are typed structs (`deny_unknown_fields`) that also
//! implement [`Validate`]. [`ValidatedJson`] rejects both malformed JSON and
//! failed checks with the standard error payload.

use crate::error::ServerError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// Field-level checks run after deserialization
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// JSON body that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(ServerError::BadRequest)?;

        Ok(Self(value))
    }
}

/// Reject blank strings
pub fn require_non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

/// Reject negative list positions
pub fn require_position(field: &str, value: Option<i64>) -> Result<(), String> {
    match value {
        Some(position) if position < 0 => Err(format!("{field} must not be negative")),
        _ => Ok(()),
    }
}
