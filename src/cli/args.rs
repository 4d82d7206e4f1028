//! CLI argument definitions (clap derive).

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// SendIT parcel delivery API
#[derive(Parser, Debug)]
#[command(name = "sendit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Email worker and notification sweeps
    Jobs(JobsArgs),

    /// Insert bootstrap data
    Seed(SeedArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Deliver queued emails
    Work,
    /// Email parties of status-0 parcels and activate status-0 users
    Notify {
        /// Repeat the sweep every N seconds instead of running once
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },
    /// Show queue counts
    List,
    /// Clear failed jobs
    Clear,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub target: SeedTarget,
}

#[derive(Subcommand, Debug)]
pub enum SeedTarget {
    /// Create admin@sendit.com unless it exists
    Admin {
        /// Password for the account; a random one is generated and printed when omitted
        #[arg(long, env = "SEED_ADMIN_PASSWORD")]
        password: Option<String>,
    },
}
