use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Journal entry. Owned indirectly: ownership checks go through the parent
/// vacation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub vacation_id: Uuid,
    pub date: Date,
    pub entry: String,
    pub created_at: OffsetDateTime,
}
