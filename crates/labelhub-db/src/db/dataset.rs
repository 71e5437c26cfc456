use crate::db::traits::DatasetStore;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use labelhub_core::{
    models::{Dataset, WorkItem},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for datasets and their work items
#[derive(Clone)]
pub struct DatasetRepository {
    pool: PgPool,
}

impl DatasetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a dataset together with its work items.
    ///
    /// Work items are written with one `UNNEST` statement so large archives cost a
    /// single round trip. The transaction is rolled back on any failure.
    #[tracing::instrument(
        skip(self, dataset, work_items),
        fields(
            db.table = "datasets",
            db.operation = "insert",
            db.record_id = %dataset.id,
            item_count = work_items.len()
        )
    )]
    pub async fn create_import(
        &self,
        dataset: &Dataset,
        work_items: &[WorkItem],
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin database transaction")?;

        sqlx::query(
            r#"
            INSERT INTO datasets (id, project_id, name, description, storage_uri, version_number, created_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(dataset.id)
        .bind(dataset.project_id)
        .bind(&dataset.name)
        .bind(&dataset.description)
        .bind(&dataset.storage_uri)
        .bind(dataset.version_number)
        .bind(dataset.created_at)
        .bind(dataset.created_by)
        .execute(&mut *tx)
        .await?;

        if !work_items.is_empty() {
            let ids: Vec<Uuid> = work_items.iter().map(|w| w.id).collect();
            let dataset_ids: Vec<Uuid> = work_items.iter().map(|w| w.dataset_id).collect();
            let scope_uris: Vec<String> = work_items.iter().map(|w| w.scope_uri.clone()).collect();
            let statuses: Vec<String> = work_items.iter().map(|w| w.status.clone()).collect();
            let positions: Vec<i32> = work_items.iter().map(|w| w.position).collect();
            let created_ats: Vec<DateTime<Utc>> =
                work_items.iter().map(|w| w.created_at).collect();

            sqlx::query(
                r#"
                INSERT INTO work_items (id, dataset_id, scope_uri, status, position, created_at)
                SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::text[], $5::int4[], $6::timestamptz[])
                "#,
            )
            .bind(&ids)
            .bind(&dataset_ids)
            .bind(&scope_uris)
            .bind(&statuses)
            .bind(&positions)
            .bind(&created_ats)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .context("Failed to commit database transaction")?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "datasets", db.operation = "select", db.record_id = %id))]
    pub async fn get_dataset(&self, id: Uuid) -> Result<Option<Dataset>, AppError> {
        let dataset = sqlx::query_as::<Postgres, Dataset>(
            r#"
            SELECT id, project_id, name, description, storage_uri, version_number, created_at, created_by
            FROM datasets WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dataset)
    }

    /// Work items of a dataset in import order
    #[tracing::instrument(skip(self), fields(db.table = "work_items", db.operation = "select"))]
    pub async fn list_work_items(&self, dataset_id: Uuid) -> Result<Vec<WorkItem>, AppError> {
        let items = sqlx::query_as::<Postgres, WorkItem>(
            r#"
            SELECT id, dataset_id, scope_uri, status, position, created_at
            FROM work_items WHERE dataset_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(dataset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[async_trait]
impl DatasetStore for DatasetRepository {
    async fn create_import(
        &self,
        dataset: &Dataset,
        work_items: &[WorkItem],
    ) -> Result<(), AppError> {
        DatasetRepository::create_import(self, dataset, work_items).await
    }
}
