use tracing::info;

use crate::db::Repository;
use crate::models::{EventListing, NewEvent};
use crate::utils::error::AppError;

pub async fn list_events(repo: &dyn Repository) -> Result<Vec<EventListing>, AppError> {
    repo.list_events().await
}

/// Creates the event's location and the event itself as one unit.
pub async fn add_event(repo: &dyn Repository, event: NewEvent) -> Result<EventListing, AppError> {
    let listing = repo.insert_event_with_location(event).await?;
    info!(
        event_id = listing.id,
        location_id = listing.location_id,
        creator_id = listing.creator_id,
        "Added event"
    );
    Ok(listing)
}
