use std::sync::Arc;

use crate::config::Config;
use crate::db::Repository;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub bcrypt_cost: u32,
    /// Mark the session cookie `Secure`; only sensible behind HTTPS.
    pub secure_cookies: bool,
}

impl From<&Config> for AuthSettings {
    fn from(config: &Config) -> Self {
        Self {
            bcrypt_cost: config.bcrypt_cost,
            secure_cookies: config.production,
        }
    }
}

/// Everything a handler may touch, passed explicitly through the router.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub sessions: Arc<SessionStore>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, sessions: SessionStore, auth: AuthSettings) -> Self {
        Self {
            repo,
            sessions: Arc::new(sessions),
            auth,
        }
    }
}
