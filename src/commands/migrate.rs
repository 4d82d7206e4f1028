//! `migrate`: manage the branches, users, orders and parcels tables.
//!
//! ```bash
//! sendit migrate up      # apply pending migrations
//! sendit migrate down    # undo the newest one
//! sendit migrate status  # list applied/pending
//! sendit migrate fresh   # drop everything and rebuild
//! ```

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            println!("Schema is up to date.");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            println!("Rolled back the newest migration.");
        }
        MigrateAction::Status => print_status(&db.migration_status().await?),
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all SendIT tables before rebuilding");
            db.fresh_migrations().await?;
            println!("Schema rebuilt from scratch; all data was removed.");
        }
    }

    Ok(())
}

fn print_status(rows: &[(String, bool)]) {
    let pending = rows.iter().filter(|(_, applied)| !applied).count();
    for (name, applied) in rows {
        let mark = if *applied { "applied" } else { "pending" };
        println!("{:<48} {}", name, mark);
    }
    println!("{} migration(s), {} pending", rows.len(), pending);
}
