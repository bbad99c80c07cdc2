use crate::{
    error::AppError,
    state::AppState,
    user::{Role, User},
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Guard extractor requiring at least the `manager` role.
pub struct ManagerUser(pub User);

/// Guard extractor requiring the `admin` role.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ManagerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Manager).await.map(ManagerUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Admin).await.map(AdminUser)
    }
}

// Checks the database rather than the token claims, so a role downgrade
// takes effect without waiting for token expiry.
async fn authorize(parts: &Parts, state: &AppState, min_role: Role) -> Result<User, AppError> {
    let user_id = parts
        .extensions
        .get::<Uuid>()
        .copied()
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    if user.role < min_role {
        return Err(AppError::Forbidden("Insufficient privileges".to_string()));
    }

    Ok(user)
}
