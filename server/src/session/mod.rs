use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Session;
use crate::utils::error::AppError;

mod extractor;

pub use extractor::{removal_cookie, session_cookie, SESSION_COOKIE};

/// In-process store of live sessions keyed by their opaque id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self, user_id: i32) -> Result<Session, AppError> {
        self.create_at(user_id, Utc::now()).await
    }

    pub async fn resolve(&self, session_id: Uuid) -> Option<Session> {
        self.resolve_at(session_id, Utc::now()).await
    }

    /// Returns whether a session was removed.
    pub async fn revoke(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub(crate) async fn create_at(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let expiry = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalServerError(format!("session ttl {} overflows expiry", self.ttl))
        })?;
        let session = Session {
            session_id: Uuid::new_v4(),
            user_id,
            expiry,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        sessions.insert(session.session_id, session.clone());

        Ok(session)
    }

    pub(crate) async fn resolve_at(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .filter(|s| !s.is_expired_at(now))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let store = SessionStore::new(Duration::hours(1));
        let session = store.create(3).await.unwrap();
        assert_eq!(session.user_id, 3);
        assert_eq!(store.resolve(session.session_id).await, Some(session));
        assert_eq!(store.resolve(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_resolve() {
        let store = SessionStore::new(Duration::seconds(60));
        let start = Utc::now();
        let session = store.create_at(1, start).await.unwrap();

        assert!(store
            .resolve_at(session.session_id, start + Duration::seconds(59))
            .await
            .is_some());
        assert!(store
            .resolve_at(session.session_id, start + Duration::seconds(60))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_purged_on_create() {
        let store = SessionStore::new(Duration::seconds(60));
        let start = Utc::now();
        store.create_at(1, start).await.unwrap();
        store.create_at(2, start).await.unwrap();
        assert_eq!(store.len().await, 2);

        store.create_at(3, start + Duration::seconds(120)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = SessionStore::new(Duration::hours(1));
        let session = store.create(1).await.unwrap();
        assert!(store.revoke(session.session_id).await);
        assert!(!store.revoke(session.session_id).await);
        assert!(store.resolve(session.session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_expiry_overflow_is_an_error() {
        let store = SessionStore::new(Duration::days(365));
        let result = store.create_at(1, DateTime::<Utc>::MAX_UTC).await;
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        assert_eq!(store.len().await, 0);
    }
}
