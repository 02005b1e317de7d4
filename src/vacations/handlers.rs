use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    journal, photos,
    state::AppState,
};

use super::dto::{
    CreateVacationRequest, UpdateVacationRequest, VacationDetails, VacationResponse,
};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/vacations", get(list_vacations))
        .route("/vacations/:id", get(get_vacation))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/vacations", post(create_vacation))
        .route("/vacations/:id", put(update_vacation).delete(delete_vacation))
}

#[instrument(skip(state))]
pub async fn list_vacations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<VacationResponse>>, AppError> {
    let vacations = repo::list_by_owner(&state.db, user_id).await?;
    Ok(Json(vacations.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_vacation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VacationDetails>, AppError> {
    let vacation = repo::find_by_owner(&state.db, id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let gallery = photos::repo::list_by_vacation(&state.db, vacation.id).await?;
    let entries = journal::repo::list_by_vacation(&state.db, vacation.id).await?;

    Ok(Json(VacationDetails {
        vacation: vacation.into(),
        photos: gallery.into_iter().map(Into::into).collect(),
        journal: entries.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_vacation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateVacationRequest>,
) -> Result<(StatusCode, Json<VacationResponse>), AppError> {
    let name = payload.name.trim();
    let destination = payload.destination.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if destination.is_empty() {
        return Err(AppError::Validation("destination must not be empty".into()));
    }

    let vacation = repo::create(
        &state.db,
        user_id,
        name,
        destination,
        payload.start_date,
        payload.end_date,
        payload.description.as_deref(),
    )
    .await?;

    info!(vacation_id = %vacation.id, "vacation created");
    Ok((StatusCode::CREATED, Json(vacation.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_vacation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVacationRequest>,
) -> Result<Json<VacationResponse>, AppError> {
    let name = match payload.name.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("name must not be empty".into())),
        other => other,
    };
    let destination = match payload.destination.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("destination must not be empty".into())),
        other => other,
    };

    let vacation = repo::update_by_owner(
        &state.db,
        id,
        user_id,
        name,
        destination,
        payload.start_date,
        payload.end_date,
        payload.description.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(vacation.into()))
}

#[instrument(skip(state))]
pub async fn delete_vacation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let vacation = repo::find_by_owner(&state.db, id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let gallery = photos::repo::list_by_vacation(&state.db, vacation.id).await?;

    if !repo::delete_by_owner(&state.db, id, user_id).await? {
        return Err(AppError::NotFound);
    }

    // Row is gone (photos and journal cascaded with it); now drop the files.
    for photo in &gallery {
        photos::services::remove_backing_file(state.storage.as_ref(), &photo.url).await;
    }

    info!(vacation_id = %id, "vacation deleted");
    Ok(StatusCode::NO_CONTENT)
}
