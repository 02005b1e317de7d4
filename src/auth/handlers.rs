use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{error::AppError, state::AppState};

use super::{
    dto::{AuthResponse, PublicUser, RefreshRequest, SignInRequest},
    flow::{AuthError, CredentialFlow},
    jwt::{AuthUser, JwtKeys},
    repo::PgUserStore,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let flow = CredentialFlow::new(
        Arc::new(PgUserStore::new(state.db.clone())),
        state.config.auth.clone(),
    );

    let user = match flow.sign_in(&payload.email, &payload.password).await {
        Ok(user) => user,
        Err(AuthError::Invalid(msg)) => return Err(AppError::Validation(msg.into())),
        Err(AuthError::Rejected) => return Err(AppError::InvalidCredentials),
        Err(AuthError::Unavailable(e)) => return Err(AppError::Internal(e)),
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id).map_err(AppError::Internal)?;
    let refresh_token = keys.sign_refresh(user.id).map_err(AppError::Internal)?;

    info!(user_id = %user.id, "sign-in accepted");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| AppError::InvalidCredentials)?;

    let store = PgUserStore::new(state.db.clone());
    let user = store
        .find_by_id(claims.sub)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or(AppError::InvalidCredentials)?;

    let access_token = keys.sign_access(user.id).map_err(AppError::Internal)?;
    let refresh_token = keys.sign_refresh(user.id).map_err(AppError::Internal)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let store = PgUserStore::new(state.db.clone());
    let user = store
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or(AppError::InvalidCredentials)?;
    Ok(Json(user.into()))
}
