//! Admin user audit record
//!
//! The admin identity itself lives in configuration; this row only exists
//! so that logins leave a durable trace. It is upserted best-effort at
//! login and never consulted for the authorization decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record for the configured admin identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Unique identifier
    pub id: i64,
    /// Admin email, unique
    pub email: String,
    /// Stored password hash, or "env" when the password comes from config
    pub password_hash: String,
    /// Role, always "admin"
    pub role: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
