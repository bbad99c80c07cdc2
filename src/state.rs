use crate::notification::{NotificationDispatcher, NotificationRepository, SubscriberRegistry};
use crate::project::ProjectRepository;
use crate::task::TaskRepository;
use crate::user::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: SubscriberRegistry,
    pub dispatcher: NotificationDispatcher,
    pub user_repository: UserRepository,
    pub project_repository: ProjectRepository,
    pub task_repository: TaskRepository,
    pub notification_repository: NotificationRepository,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub upload_dir: String,
    pub export_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("JWT_EXPIRATION_MINUTES must be a number"),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string()),
            export_dir: std::env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "./exports".to_string()),
        }
    }
}
