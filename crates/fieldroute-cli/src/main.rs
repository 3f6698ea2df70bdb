mod db;
mod reimbursements;
mod route;
mod schedule;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::reimbursements::ReimbursementCommands;
use crate::schedule::ScheduleCommands;

#[derive(Debug, Parser)]
#[command(name = "fieldroute-cli")]
#[command(about = "Field supervisor routes, schedules and reimbursements")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Show a supervisor's weekly route
    Route {
        /// Supervisor id (e.g. s41861921)
        #[arg(long)]
        supervisor: String,
    },
    /// Inspect or edit a supervisor's weekly visit matrix
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Submit or list expense claims
    Reimbursements {
        #[command(subcommand)]
        command: ReimbursementCommands,
    },
    /// List the supervisors reporting to a manager
    Roster {
        /// Manager id (e.g. zce0bf2f8)
        #[arg(long)]
        manager: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("fieldroute-cli: no command given; run with --help");
        return Ok(());
    };

    let config = fieldroute_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = fieldroute_db::PoolConfig::from_app_config(&config);
    let pool = fieldroute_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => db::run(&pool, &config, command).await,
        Commands::Route { supervisor } => route::run_route(&pool, &supervisor).await,
        Commands::Schedule { command } => schedule::run(&pool, command).await,
        Commands::Reimbursements { command } => {
            reimbursements::run(&pool, config.history_default_limit, command).await
        }
        Commands::Roster { manager } => route::run_roster(&pool, &manager).await,
    }
}

/// Display placeholder for missing values.
fn dash() -> String {
    "-".to_string()
}
