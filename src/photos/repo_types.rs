use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Photo row. `url` is the public URL issued by the file store when the
/// upload was written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vacation_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: OffsetDateTime,
}
