/// User domain type
use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved user identity
///
/// Authentication happens outside the core; handlers receive this already
/// looked up from the bearer API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Contact email (unique)
    pub email: String,

    /// Bearer token for API clients
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}
