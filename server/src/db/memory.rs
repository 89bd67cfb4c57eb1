use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Repository;
use crate::models::{Event, EventListing, Location, NewEvent, NewUser, User};
use crate::utils::error::AppError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    locations: Vec<Location>,
    events: Vec<Event>,
}

/// Repository backed by vectors, mirroring the Postgres schema's constraints.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().await;
        (
            tables.users.len(),
            tables.locations.len(),
            tables.events.len(),
        )
    }
}

fn next_id(len: usize) -> i32 {
    len as i32 + 1
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        let row = User {
            id: next_id(tables.users.len()),
            username: user.username,
            password_hash: user.password_hash,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn list_events(&self) -> Result<Vec<EventListing>, AppError> {
        let tables = self.tables.lock().await;
        let mut listings = tables
            .events
            .iter()
            .map(|e| {
                let location = tables
                    .locations
                    .iter()
                    .find(|l| l.id == e.location_id)
                    .ok_or_else(|| AppError::NotFound(format!("location {}", e.location_id)))?;
                Ok(EventListing::from_parts(e.clone(), location.clone()))
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        listings.sort_by_key(|l| l.id);
        Ok(listings)
    }

    async fn insert_event_with_location(&self, event: NewEvent) -> Result<EventListing, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == event.creator_id) {
            return Err(AppError::NotFound(format!("user {}", event.creator_id)));
        }

        let location = Location {
            id: next_id(tables.locations.len()),
            name: event.location_name,
            address: event.location_address,
        };
        let row = Event {
            id: next_id(tables.events.len()),
            name: event.name,
            category: event.category,
            status: event.status,
            time: event.time,
            location_id: location.id,
            creator_id: event.creator_id,
        };
        tables.locations.push(location.clone());
        tables.events.push(row.clone());

        Ok(EventListing::from_parts(row, location))
    }
}
