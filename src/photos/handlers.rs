use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::AppError, state::AppState, vacations};

use super::dto::{PhotoResponse, UpdatePhotoRequest};
use super::repo;
use super::services::{self, UploadItem};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/vacations/:id/photos", get(list_photos))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/vacations/:id/photos", post(upload_photos))
        .route("/photos/:id", put(update_photo).delete(delete_photo))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(vacation_id): Path<Uuid>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    vacations::repo::find_by_owner(&state.db, vacation_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let photos = repo::list_by_vacation(&state.db, vacation_id).await?;
    Ok(Json(photos.into_iter().map(Into::into).collect()))
}

/// POST /vacations/:id/photos — multipart `files[]`.
#[instrument(skip(state, mp))]
pub async fn upload_photos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(vacation_id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<Vec<PhotoResponse>>), AppError> {
    vacations::repo::find_by_owner(&state.db, vacation_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut files = Vec::new();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if !matches!(field.name(), Some("files") | Some("files[]")) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("photo.bin").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        files.push(UploadItem {
            file_name,
            content_type,
            body,
        });
    }
    if files.is_empty() {
        return Err(AppError::Validation("files[] is required".into()));
    }

    let photos = services::upload_and_attach(&state, user_id, vacation_id, files).await?;

    info!(vacation_id = %vacation_id, count = photos.len(), "photos uploaded");
    Ok((
        StatusCode::CREATED,
        Json(photos.into_iter().map(Into::into).collect()),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePhotoRequest>,
) -> Result<Json<PhotoResponse>, AppError> {
    let photo = repo::update_caption_by_owner(&state.db, id, user_id, &payload.caption)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(photo.into()))
}

#[instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let photo = repo::delete_by_owner(&state.db, id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    services::remove_backing_file(state.storage.as_ref(), &photo.url).await;

    info!(photo_id = %id, "photo deleted");
    Ok(StatusCode::NO_CONTENT)
}
