use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::journal::dto::JournalEntryResponse;
use crate::photos::dto::PhotoResponse;

use super::repo_types::Vacation;

#[derive(Debug, Deserialize)]
pub struct CreateVacationRequest {
    pub name: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVacationRequest {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VacationResponse {
    pub id: Uuid,
    pub name: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Vacation> for VacationResponse {
    fn from(v: Vacation) -> Self {
        Self {
            id: v.id,
            name: v.name,
            destination: v.destination,
            start_date: v.start_date,
            end_date: v.end_date,
            description: v.description,
            created_at: v.created_at,
        }
    }
}

/// Detail view: the vacation with its photo gallery and journal.
#[derive(Debug, Serialize)]
pub struct VacationDetails {
    #[serde(flatten)]
    pub vacation: VacationResponse,
    pub photos: Vec<PhotoResponse>,
    pub journal: Vec<JournalEntryResponse>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn create_request_accepts_plain_dates() {
        let req: CreateVacationRequest = serde_json::from_str(
            r#"{
                "name": "Summer trip",
                "destination": "Lisbon",
                "start_date": "2026-08-01",
                "end_date": "2026-08-14"
            }"#,
        )
        .unwrap();
        assert_eq!(req.start_date, date!(2026 - 08 - 01));
        assert_eq!(req.end_date, date!(2026 - 08 - 14));
        assert!(req.description.is_none());
    }

    #[test]
    fn update_request_fields_are_all_optional() {
        let req: UpdateVacationRequest = serde_json::from_str(r#"{"name": "Renamed"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Renamed"));
        assert!(req.destination.is_none());
        assert!(req.start_date.is_none());
    }
}
