use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::Result, middleware::AdminUser, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub users: i64,
    pub projects: i64,
    pub tasks: i64,
}

/// Row counts across the system (admin role required)
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Entity counts", body = StatsResponse),
        (status = 403, description = "Insufficient privileges"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<StatsResponse>> {
    let users = state.user_repository.count().await?;
    let projects = state.project_repository.count().await?;
    let tasks = state.task_repository.count().await?;

    tracing::debug!("Stats requested by {}", admin.username);

    Ok(Json(StatsResponse {
        users,
        projects,
        tasks,
    }))
}
