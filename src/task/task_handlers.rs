use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::task_dto::{BulkImportResponse, CreateTaskRequest, UpdateTaskRequest};
use super::task_models::Task;
use crate::{
    error::{AppError, Result},
    middleware::ManagerUser,
    state::AppState,
};

/// Add a task to a project and notify the project owner
#[utoipa::path(
    post,
    path = "/api/projects/{id}/tasks",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let project = state
        .project_repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let task = state
        .task_repository
        .create(
            project.id,
            &payload.title,
            payload.description.as_deref(),
            payload.completed,
        )
        .await?;

    // The notification row must land; live delivery is queued off the
    // request path and cannot fail this call.
    let message = format!("New task '{}' in project '{}'", task.title, project.name);
    state.dispatcher.dispatch(project.owner_id, &message).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task, bumping its version
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    payload.validate()?;

    let task = state
        .task_repository
        .update(
            task_id,
            &payload.title,
            payload.description.as_deref(),
            payload.completed,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Soft-delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task soft-deleted"),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode> {
    let rows_affected = state.task_repository.soft_delete(task_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Import a batch of tasks into a project (manager role required)
#[utoipa::path(
    post,
    path = "/api/projects/{id}/tasks/bulk",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = Vec<CreateTaskRequest>,
    responses(
        (status = 200, description = "Tasks imported", body = BulkImportResponse),
        (status = 404, description = "Project not found"),
        (status = 403, description = "Insufficient privileges")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn bulk_import_tasks(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Path(project_id): Path<Uuid>,
    Json(rows): Json<Vec<CreateTaskRequest>>,
) -> Result<Json<BulkImportResponse>> {
    for row in &rows {
        row.validate()?;
    }

    let project = state
        .project_repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let created = state.task_repository.bulk_create(project.id, &rows).await?;

    tracing::info!(
        "{} imported {} tasks into project {}",
        manager.username,
        created.len(),
        project.id
    );

    Ok(Json(BulkImportResponse {
        created: created.len(),
        task_ids: created.into_iter().map(|t| t.id).collect(),
    }))
}
