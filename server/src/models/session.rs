use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Server-side record binding a session cookie to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: i32,
    pub expiry: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// The authenticated principal, resolved once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
    pub session_id: Uuid,
}
