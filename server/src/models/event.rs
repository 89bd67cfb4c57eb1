use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::Location;
use crate::utils::error::AppError;

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub status: String,
    pub time: NaiveTime,
    pub location_id: i32,
    pub creator_id: i32,
}

/// An event joined with the location it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EventListing {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub status: String,
    pub time: NaiveTime,
    pub creator_id: i32,
    pub location_id: i32,
    pub location_name: String,
    pub location_address: Option<String>,
}

impl EventListing {
    pub fn from_parts(event: Event, location: Location) -> Self {
        Self {
            id: event.id,
            name: event.name,
            category: event.category,
            status: event.status,
            time: event.time,
            creator_id: event.creator_id,
            location_id: location.id,
            location_name: location.name,
            location_address: location.address,
        }
    }
}

/// A validated add-event submission bound to its creator.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub category: String,
    pub status: String,
    pub time: NaiveTime,
    pub location_name: String,
    pub location_address: Option<String>,
    pub creator_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddEventForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "time is required"))]
    pub time: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "location_name is required"))]
    pub location_name: String,
    #[serde(default)]
    pub location_address: Option<String>,
}

impl AddEventForm {
    /// Trims every field, validates, and attaches the creator.
    pub fn into_new_event(self, creator_id: i32) -> Result<NewEvent, AppError> {
        let form = AddEventForm {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            status: self.status.trim().to_string(),
            time: self.time.trim().to_string(),
            location_name: self.location_name.trim().to_string(),
            location_address: self
                .location_address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        };
        form.validate()?;

        Ok(NewEvent {
            time: parse_time(&form.time)?,
            name: form.name,
            category: form.category,
            status: form.status,
            location_name: form.location_name,
            location_address: form.location_address,
            creator_id,
        })
    }
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| AppError::ValidationError(format!("time '{}' is not HH:MM", raw)))
}
