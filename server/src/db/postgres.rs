use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::Repository;
use crate::models::{Event, EventListing, Location, NewEvent, NewUser, User};
use crate::utils::error::AppError;

const LIST_EVENTS: &str = r#"
    SELECT e.id, e.name, e.category, e.status, e.time, e.creator_id,
           l.id AS location_id, l.name AS location_name, l.address AS location_address
    FROM events e
    JOIN locations l ON l.id = e.location_id
    ORDER BY e.id ASC
"#;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("username '{}' is already taken", user.username))
            }
            e => AppError::DatabaseError(e),
        })
    }

    async fn list_events(&self) -> Result<Vec<EventListing>, AppError> {
        let events = sqlx::query_as::<_, EventListing>(LIST_EVENTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn insert_event_with_location(&self, event: NewEvent) -> Result<EventListing, AppError> {
        // Dropping the transaction without commit rolls both inserts back.
        let mut tx = self.pool.begin().await?;

        let location = sqlx::query_as::<_, Location>(
            "INSERT INTO locations (name, address) VALUES ($1, $2) RETURNING id, name, address",
        )
        .bind(&event.location_name)
        .bind(&event.location_address)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, Event>(
            "INSERT INTO events (name, category, status, time, location_id, creator_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, category, status, time, location_id, creator_id",
        )
        .bind(&event.name)
        .bind(&event.category)
        .bind(&event.status)
        .bind(event.time)
        .bind(location.id)
        .bind(event.creator_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(event_id = row.id, location_id = location.id, "Inserted event");

        Ok(EventListing::from_parts(row, location))
    }
}
