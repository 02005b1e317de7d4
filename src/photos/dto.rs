use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Photo;

#[derive(Debug, Deserialize)]
pub struct UpdatePhotoRequest {
    pub caption: String,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub vacation_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Photo> for PhotoResponse {
    fn from(p: Photo) -> Self {
        Self {
            id: p.id,
            vacation_id: p.vacation_id,
            url: p.url,
            caption: p.caption,
            created_at: p.created_at,
        }
    }
}
