pub mod project_dto;
pub mod project_handlers;
pub mod project_models;
pub mod project_repository;

pub use project_dto::{CreateProjectRequest, ProjectResponse, UploadResponse};
pub use project_repository::ProjectRepository;
