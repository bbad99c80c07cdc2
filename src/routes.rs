use crate::{
    admin::{admin_handlers, StatsResponse},
    export::{self, ExportResponse},
    middleware::auth_middleware,
    notification::{notification_handlers, Notification},
    project::{
        project_handlers, CreateProjectRequest, ProjectResponse, UploadResponse,
    },
    state::AppState,
    task::{task_handlers, BulkImportResponse, CreateTaskRequest, Task, UpdateTaskRequest},
    user::{user_handlers, LoginRequest, RegisterRequest, Role, TokenResponse, UserResponse},
    websocket::ws_handler,
};
use axum::{
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        user_handlers::register,
        user_handlers::login,
        project_handlers::create_project,
        project_handlers::list_projects,
        project_handlers::get_project,
        project_handlers::delete_project,
        project_handlers::upload_file,
        task_handlers::create_task,
        task_handlers::update_task,
        task_handlers::delete_task,
        task_handlers::bulk_import_tasks,
        notification_handlers::get_notifications,
        notification_handlers::mark_notification_seen,
        export::export_projects,
        admin_handlers::get_stats,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            Role,
            CreateProjectRequest,
            ProjectResponse,
            UploadResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            BulkImportResponse,
            Task,
            Notification,
            ExportResponse,
            StatsResponse,
        )
    ),
    tags(
        (name = "users", description = "Registration and authentication"),
        (name = "projects", description = "Project management endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "files", description = "File upload"),
        (name = "export", description = "CSV export"),
        (name = "admin", description = "Administrative endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/users/register", post(user_handlers::register))
        .route("/users/login", post(user_handlers::login));

    // Protected routes (auth required; role guards sit on the handlers)
    let protected_routes = Router::new()
        .route(
            "/projects",
            post(project_handlers::create_project).get(project_handlers::list_projects),
        )
        .route(
            "/projects/:id",
            get(project_handlers::get_project).delete(project_handlers::delete_project),
        )
        .route("/projects/:id/tasks", post(task_handlers::create_task))
        .route(
            "/projects/:id/tasks/bulk",
            post(task_handlers::bulk_import_tasks),
        )
        .route("/projects/:id/upload", post(project_handlers::upload_file))
        .route(
            "/tasks/:id",
            put(task_handlers::update_task).delete(task_handlers::delete_task),
        )
        .route(
            "/notifications",
            get(notification_handlers::get_notifications),
        )
        .route(
            "/notifications/:id/seen",
            patch(notification_handlers::mark_notification_seen),
        )
        .route("/export/projects", post(export::export_projects))
        .route("/admin/stats", get(admin_handlers::get_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .route("/ws/:user_id", get(ws_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "msg": "Taskhub API up, see /swagger-ui" }))
}
