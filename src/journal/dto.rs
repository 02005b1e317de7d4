use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::JournalEntry;

#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    pub date: Date,
    pub entry: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJournalEntryRequest {
    pub date: Option<Date>,
    pub entry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub id: Uuid,
    pub vacation_id: Uuid,
    pub date: Date,
    pub entry: String,
    pub created_at: OffsetDateTime,
}

impl From<JournalEntry> for JournalEntryResponse {
    fn from(e: JournalEntry) -> Self {
        Self {
            id: e.id,
            vacation_id: e.vacation_id,
            date: e.date,
            entry: e.entry,
            created_at: e.created_at,
        }
    }
}
