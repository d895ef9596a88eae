use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Application, ApplicationRow, ApplicationStatus, NewApplication};

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    /// Persists a new application with status `Pending`.
    async fn create(&self, new: NewApplication) -> anyhow::Result<Application>;

    /// All applications in submission order, optionally restricted to one status.
    async fn list(&self, status: Option<ApplicationStatus>) -> anyhow::Result<Vec<Application>>;

    /// Overwrites the status. `None` when the id does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> anyhow::Result<Option<Application>>;
}

#[derive(Clone)]
pub struct PgApplicationRepo {
    db: PgPool,
}

impl PgApplicationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_application(row: ApplicationRow) -> anyhow::Result<Application> {
    let id = row.id;
    Application::try_from(row).with_context(|| format!("decode application {id}"))
}

#[async_trait]
impl ApplicationRepo for PgApplicationRepo {
    async fn create(&self, new: NewApplication) -> anyhow::Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, name, email, role, message, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, role, message, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.email)
        .bind(new.role)
        .bind(new.message)
        .bind(ApplicationStatus::default().as_str())
        .fetch_one(&self.db)
        .await
        .context("insert application")?;
        into_application(row)
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> anyhow::Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, name, email, role, message, status, created_at
            FROM applications
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(status.map(ApplicationStatus::as_str))
        .fetch_all(&self.db)
        .await
        .context("list applications")?;
        rows.into_iter().map(into_application).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> anyhow::Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
               SET status = $2
             WHERE id = $1
            RETURNING id, name, email, role, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.db)
        .await
        .context("update application status")?;
        row.map(into_application).transpose()
    }
}
