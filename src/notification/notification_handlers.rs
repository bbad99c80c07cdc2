use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::notification_models::Notification;
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

/// Notifications of the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "List of notifications", body = Vec<Notification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .notification_repository
        .find_all_by_user(user_id)
        .await?;

    Ok(Json(notifications))
}

/// Mark a notification as seen
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/seen",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as seen", body = Notification),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_seen(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>> {
    let notification = state
        .notification_repository
        .mark_as_seen(notification_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}
