use crate::db::traits::ProjectDirectory;
use async_trait::async_trait;
use labelhub_core::{models::Project, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for projects and their members
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "insert"))]
    pub async fn create_project(&self, name: String) -> Result<Project, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(
            r#"
            INSERT INTO projects (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    pub async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(
            "SELECT id, name, created_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Add `user_id` to the project. Returns `false` when the membership already existed.
    #[tracing::instrument(skip(self), fields(db.table = "project_members", db.operation = "insert"))]
    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_members (id, project_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "project_members", db.operation = "select"))]
    pub async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let member = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }
}

#[async_trait]
impl ProjectDirectory for ProjectRepository {
    async fn project_exists(&self, project_id: Uuid) -> Result<bool, AppError> {
        self.exists(project_id).await
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        ProjectRepository::is_member(self, project_id, user_id).await
    }
}
