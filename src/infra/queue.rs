//! Outbound email queue backed by apalis' PostgreSQL storage.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Accepts emails for later delivery by the job worker.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn enqueue_email(&self, job: EmailJob) -> AppResult<()>;
}

#[derive(Clone)]
pub struct JobQueue {
    storage: PostgresStorage<EmailJob>,
}

impl JobQueue {
    /// Open a small pool and make sure the apalis tables exist.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| AppError::queue(format!("Failed to connect job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::queue(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self {
            storage: PostgresStorage::new(pool),
        })
    }

    pub fn storage(&self) -> PostgresStorage<EmailJob> {
        self.storage.clone()
    }
}

#[async_trait]
impl Notifier for JobQueue {
    async fn enqueue_email(&self, job: EmailJob) -> AppResult<()> {
        let to = job.to.clone();
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::queue(format!("Failed to enqueue email to {}: {}", to, e)))?;

        tracing::debug!(to = %to, "Email queued");
        Ok(())
    }
}
