//! `jobs`: the email worker, the status-0 notifier and queue housekeeping.
//!
//! ```bash
//! sendit jobs work              # deliver queued emails
//! sendit jobs notify --watch 30 # sweep status-0 parcels and users every 30s
//! sendit jobs list              # queue counts by status
//! sendit jobs clear             # drop failed jobs
//! ```

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_EMAIL};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, JobQueue, Persistence};
use crate::jobs::NotificationSweep;

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::Notify { watch } => run_notifier(&config, watch).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Deliver queued emails until Ctrl+C.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    use crate::jobs::email_job_handler;

    let queue = JobQueue::connect(&config.database_url).await?;
    tracing::info!(queue = JOB_NAME_EMAIL, "Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new("email-worker")
        .backend(queue.storage())
        .build_fn(email_job_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Worker error");
                return Err(AppError::queue(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

/// One sweep, or one sweep every `watch` seconds until Ctrl+C.
async fn run_notifier(config: &Config, watch: Option<u64>) -> AppResult<()> {
    let db = connect(config).await?;
    let queue = Arc::new(JobQueue::connect(&config.database_url).await?);
    let sweep = NotificationSweep::new(Arc::new(Persistence::new(db)), queue);

    let Some(seconds) = watch else {
        let report = sweep.run_once().await?;
        println!(
            "Notified {} parcel(s), queued {} email(s), activated {} user(s), deferred {}, {} failed write(s).",
            report.parcels_notified,
            report.emails_queued,
            report.users_activated,
            report.parcels_deferred,
            report.write_failures
        );
        return Ok(());
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(seconds.max(1)));
    tracing::info!(every_seconds = seconds, "Notifier watching. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = sweep.run_once().await {
                    tracing::error!(error = %e, "Notification sweep failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal, stopping notifier...");
                return Ok(());
            }
        }
    }
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Run 'jobs work' first to create the queue tables.");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut counts = [("Pending", 0i64), ("Running", 0), ("Failed", 0), ("Done", 0)];
    for row in rows {
        let status: String = row.try_get("", "status")?;
        let count: i64 = row.try_get("", "count")?;
        if let Some(slot) = counts.iter_mut().find(|(name, _)| *name == status) {
            slot.1 = count;
        }
    }

    println!("\n=== Job Queue Status ===");
    for (name, count) in counts {
        println!("{:<9} {}", format!("{}:", name), count);
    }
    println!("========================\n");

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;

    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());
    Ok(())
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let db = Database::connect_without_migrations(config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    Ok(db.get_connection())
}

async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;

    Ok(row
        .map(|r| r.try_get::<bool>("", "exists"))
        .transpose()?
        .unwrap_or(false))
}
