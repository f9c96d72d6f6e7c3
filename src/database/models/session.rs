use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Browser session row. Only the SHA-256 of the cookie value is stored.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub key_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
