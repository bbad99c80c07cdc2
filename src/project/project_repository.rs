use super::project_models::Project;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: Uuid,
    ) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, description, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    /// Non-deleted projects, optionally filtered by a substring of name or
    /// description.
    pub async fn list(&self, limit: i64, offset: i64, search: Option<&str>) -> Result<Vec<Project>> {
        let projects = match search {
            Some(q) => {
                let pattern = format!("%{}%", q);
                sqlx::query_as::<_, Project>(
                    "SELECT * FROM projects
                     WHERE is_deleted = FALSE AND (name ILIKE $1 OR description ILIKE $1)
                     ORDER BY created_at
                     LIMIT $2 OFFSET $3",
                )
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Project>(
                    "SELECT * FROM projects
                     WHERE is_deleted = FALSE
                     ORDER BY created_at
                     LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(projects)
    }

    pub async fn find_by_id(&self, project_id: Uuid) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn soft_delete(&self, project_id: Uuid) -> Result<u64> {
        let result = sqlx::query("UPDATE projects SET is_deleted = TRUE WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_all_active(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE is_deleted = FALSE ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
