mod admin;
mod auth;
mod db;
mod error;
mod export;
mod middleware;
mod notification;
mod project;
mod routes;
mod state;
mod task;
mod user;
mod websocket;

use db::{create_pool, run_migrations};
use notification::{NotificationDispatcher, NotificationRepository, SubscriberRegistry};
use project::ProjectRepository;
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use task::TaskRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::UserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskhub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Upload and export targets must exist before the first request
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.export_dir).await?;

    // Create repositories
    let user_repository = UserRepository::new(db.clone());
    let project_repository = ProjectRepository::new(db.clone());
    let task_repository = TaskRepository::new(db.clone());
    let notification_repository = NotificationRepository::new(db.clone());

    // Notification fan-out: registry of live push connections plus the
    // dispatcher that records events and feeds the delivery task
    let registry = SubscriberRegistry::new();
    let dispatcher = NotificationDispatcher::new(
        user_repository.clone(),
        notification_repository.clone(),
        registry.clone(),
    );

    // Create application state
    let state = AppState {
        config: config.clone(),
        registry,
        dispatcher,
        user_repository,
        project_repository,
        task_repository,
        notification_repository,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
