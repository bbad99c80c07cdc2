use super::task_dto::CreateTaskRequest;
use super::task_models::Task;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        project_id: Uuid,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, completed, project_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Full update of a non-deleted task, bumping its version counter.
    pub async fn update(
        &self,
        task_id: Uuid,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET title = $2, description = $3, completed = $4, version = version + 1
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING *",
        )
        .bind(task_id)
        .bind(title)
        .bind(description)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn soft_delete(&self, task_id: Uuid) -> Result<u64> {
        let result = sqlx::query("UPDATE tasks SET is_deleted = TRUE WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE project_id = $1 AND is_deleted = FALSE
             ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Inserts all rows in one transaction; either every task lands or none
    /// does.
    pub async fn bulk_create(
        &self,
        project_id: Uuid,
        rows: &[CreateTaskRequest],
    ) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let task = sqlx::query_as::<_, Task>(
                "INSERT INTO tasks (title, description, completed, project_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING *",
            )
            .bind(&row.title)
            .bind(row.description.as_deref())
            .bind(row.completed)
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;
            created.push(task);
        }

        tx.commit().await?;

        Ok(created)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
