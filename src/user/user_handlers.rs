use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use super::user_dto::{LoginRequest, RegisterRequest, TokenResponse};
use super::user_models::UserResponse;
use crate::{
    auth::{create_access_token, hash_password, verify_password},
    error::{AppError, Result},
    state::AppState,
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Username or email already taken")
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let existing = state
        .user_repository
        .find_by_username_or_email(&payload.username, &payload.email)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    // The exists check above races with concurrent registrations: the losing
    // insert trips the unique constraint and must still read as a conflict.
    let user = state
        .user_repository
        .create(&payload.username, &payload.email, &password_hash)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AppError::Conflict("User exists".to_string())
            } else {
                e
            }
        })?;

    tracing::info!("Registered user {}", user.username);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange username and password for an access token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Authentication("Account is deactivated".to_string()));
    }

    let token = create_access_token(
        user.id,
        &user.email,
        &user.role.to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_minutes,
    )?;

    Ok(Json(TokenResponse::bearer(token)))
}
