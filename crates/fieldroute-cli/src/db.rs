//! `db` subcommands: connectivity check, migrations, and catalog seeding.

use clap::Subcommand;
use fieldroute_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load stores, managers, supervisors and initial visits from the catalog file
    Seed,
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            fieldroute_db::ping(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = fieldroute_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => run_seed(pool, config).await?,
    }
    Ok(())
}

/// Seed reference data from `FIELDROUTE_CATALOG_PATH`.
///
/// # Errors
///
/// Returns an error if the catalog file is missing or invalid, or if any
/// database write fails (nothing is written in that case).
async fn run_seed(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = fieldroute_core::load_catalog(&config.catalog_path)?;
    let summary = fieldroute_db::seed_catalog(pool, &catalog).await?;

    tracing::info!(
        path = %config.catalog_path.display(),
        stores = summary.stores,
        supervisors = summary.supervisors,
        visits_added = summary.visits_added,
        "catalog seeded"
    );
    println!(
        "seeded {} store(s), {} manager(s), {} supervisor(s); {} new visit(s)",
        summary.stores, summary.managers, summary.supervisors, summary.visits_added
    );
    Ok(())
}
