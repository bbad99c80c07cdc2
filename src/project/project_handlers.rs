use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::project_dto::{
    CreateProjectRequest, ListProjectsQuery, ProjectResponse, UploadResponse,
};
use crate::{
    error::{AppError, Result},
    middleware::{AuthUser, ManagerUser},
    state::AppState,
};

/// Create a project owned by the authenticated user
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let project = state
        .project_repository
        .create(&payload.name, payload.description.as_deref(), user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_parts(project, Vec::new())),
    ))
}

/// List non-deleted projects with their tasks
#[utoipa::path(
    get,
    path = "/api/projects",
    params(
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("q" = Option<String>, Query, description = "Substring match on name or description")
    ),
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state
        .project_repository
        .list(query.limit(), query.offset(), query.q.as_deref())
        .await?;

    let mut responses = Vec::with_capacity(projects.len());
    for project in projects {
        let tasks = state.task_repository.list_by_project(project.id).await?;
        responses.push(ProjectResponse::from_parts(project, tasks));
    }

    Ok(Json(responses))
}

/// Get a single project with its tasks
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    let project = state
        .project_repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let tasks = state.task_repository.list_by_project(project.id).await?;

    Ok(Json(ProjectResponse::from_parts(project, tasks)))
}

/// Soft-delete a project (manager role required)
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project soft-deleted"),
        (status = 404, description = "Project not found"),
        (status = 403, description = "Insufficient privileges")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode> {
    let rows_affected = state.project_repository.soft_delete(project_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    tracing::info!("Project {} soft-deleted by {}", project_id, manager.username);

    Ok(StatusCode::NO_CONTENT)
}

/// Attach an uploaded file to a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/upload",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 404, description = "Project not found"),
        (status = 400, description = "Missing file field")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    state
        .project_repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload.bin".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        let filename = format!("{}_{}", Uuid::new_v4().simple(), original_name);
        let path = std::path::Path::new(&state.config.upload_dir).join(&filename);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            tracing::error!("Failed to store upload {:?}: {}", path, e);
            AppError::InternalError
        })?;

        return Ok(Json(UploadResponse {
            filename,
            path: path.to_string_lossy().into_owned(),
        }));
    }

    Err(AppError::BadRequest("Missing file field".to_string()))
}
