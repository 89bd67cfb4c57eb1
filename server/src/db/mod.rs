use async_trait::async_trait;

use crate::models::{EventListing, NewEvent, NewUser, User};
use crate::utils::error::AppError;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRepository;

/// Data access used by the services. Every query is explicit; there is no
/// lazy relationship loading behind these methods.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Fails with [`AppError::Conflict`] when the username is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    /// All events joined with their location, ascending by event id.
    async fn list_events(&self) -> Result<Vec<EventListing>, AppError>;

    /// Inserts a fresh location and an event pointing at it in one transaction.
    async fn insert_event_with_location(&self, event: NewEvent) -> Result<EventListing, AppError>;
}
