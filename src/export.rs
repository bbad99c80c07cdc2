use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::Result, middleware::ManagerUser, project::ProjectRepository, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportResponse {
    pub export_path: String,
}

/// Schedule a CSV export of all non-deleted projects (manager role required)
#[utoipa::path(
    post,
    path = "/api/export/projects",
    responses(
        (status = 200, description = "Export scheduled", body = ExportResponse),
        (status = 403, description = "Insufficient privileges"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "export",
    security(("bearer_auth" = []))
)]
pub async fn export_projects(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
) -> Result<Json<ExportResponse>> {
    let path = std::path::Path::new(&state.config.export_dir)
        .join(format!("projects_{}.csv", Uuid::new_v4().simple()))
        .to_string_lossy()
        .into_owned();

    tracing::info!("Project export to {} requested by {}", path, manager.username);

    // The caller gets the path immediately; the file fills in behind it.
    let repository = state.project_repository.clone();
    let out = path.clone();
    tokio::spawn(async move {
        if let Err(e) = write_projects_csv(&repository, &out).await {
            tracing::error!("Project export to {} failed: {:?}", out, e);
        }
    });

    Ok(Json(ExportResponse { export_path: path }))
}

async fn write_projects_csv(repository: &ProjectRepository, path: &str) -> anyhow::Result<()> {
    let projects = repository.find_all_active().await?;

    let mut csv = String::from("id,name,description,owner_id,created_at\n");
    for project in &projects {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            project.id,
            csv_field(&project.name),
            csv_field(project.description.as_deref().unwrap_or("")),
            project.owner_id,
            project.created_at.to_rfc3339(),
        ));
    }

    tokio::fs::write(path, csv).await?;
    tracing::info!("Exported {} projects to {}", projects.len(), path);

    Ok(())
}

/// Quotes a field when it contains a comma, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field_unquoted() {
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_comma_and_quote_escaping() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }
}
