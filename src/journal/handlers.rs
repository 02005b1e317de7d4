use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::AppError, state::AppState, vacations};

use super::dto::{CreateJournalEntryRequest, JournalEntryResponse, UpdateJournalEntryRequest};
use super::repo;

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/vacations/:id/journal", post(create_entry))
        .route("/journal/:id", put(update_entry).delete(delete_entry))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(vacation_id): Path<Uuid>,
    Json(payload): Json<CreateJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), AppError> {
    if payload.entry.trim().is_empty() {
        return Err(AppError::Validation("entry must not be empty".into()));
    }

    vacations::repo::find_by_owner(&state.db, vacation_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let entry = repo::insert(&state.db, vacation_id, payload.date, payload.entry.trim()).await?;

    info!(entry_id = %entry.id, vacation_id = %vacation_id, "journal entry created");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJournalEntryRequest>,
) -> Result<Json<JournalEntryResponse>, AppError> {
    let entry = match payload.entry.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("entry must not be empty".into())),
        other => other,
    };

    let updated = repo::update_by_owner(&state.db, id, user_id, payload.date, entry)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(updated.into()))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_by_owner(&state.db, id, user_id).await? {
        return Err(AppError::NotFound);
    }
    info!(entry_id = %id, "journal entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
