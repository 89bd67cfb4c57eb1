use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}
