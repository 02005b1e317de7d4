use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}
