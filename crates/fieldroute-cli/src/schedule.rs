//! `schedule` subcommands: print the visit matrix or change one store's days.

use clap::Subcommand;
use fieldroute_core::{ChangeSet, Weekday};

#[derive(Debug, Subcommand)]
pub enum ScheduleCommands {
    /// Print the weekly visit matrix for a supervisor
    Show {
        #[arg(long)]
        supervisor: String,
    },
    /// Replace the days a store is visited (adds the store if it is new)
    Set {
        #[arg(long)]
        supervisor: String,
        #[arg(long)]
        store: String,
        /// Comma-separated days, e.g. MONDAY,THURSDAY or lunes,jueves
        #[arg(long, value_delimiter = ',', required = true)]
        days: Vec<Weekday>,
    },
    /// Remove a store from a supervisor's schedule
    Clear {
        #[arg(long)]
        supervisor: String,
        #[arg(long)]
        store: String,
    },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: ScheduleCommands) -> anyhow::Result<()> {
    match command {
        ScheduleCommands::Show { supervisor } => run_show(pool, &supervisor).await,
        ScheduleCommands::Set {
            supervisor,
            store,
            days,
        } => run_edit(pool, &supervisor, &store, days).await,
        ScheduleCommands::Clear { supervisor, store } => {
            run_edit(pool, &supervisor, &store, Vec::new()).await
        }
    }
}

async fn run_show(pool: &sqlx::PgPool, supervisor_id: &str) -> anyhow::Result<()> {
    if fieldroute_db::get_supervisor(pool, supervisor_id)
        .await?
        .is_none()
    {
        anyhow::bail!("supervisor '{supervisor_id}' not found");
    }

    let rows = fieldroute_db::list_schedule_matrix(pool, supervisor_id).await?;
    if rows.is_empty() {
        println!("no visits planned for supervisor {supervisor_id}");
        return Ok(());
    }

    let day_headers: String = Weekday::ALL
        .iter()
        .map(|d| format!("{:<4}", &d.as_str()[..3]))
        .collect();
    println!("{:<10}{day_headers}NAME", "STORE");
    for row in &rows {
        let marks: String = Weekday::ALL
            .iter()
            .map(|d| if row.days.contains(d) { "x   " } else { ".   " })
            .collect();
        println!("{:<10}{marks}{}", row.store_id, row.store_name);
    }
    Ok(())
}

/// Load the stored matrix, change one store's row, and save the result.
async fn run_edit(
    pool: &sqlx::PgPool,
    supervisor_id: &str,
    store_id: &str,
    days: Vec<Weekday>,
) -> anyhow::Result<()> {
    let mut schedule = fieldroute_db::load_weekly_schedule(pool, supervisor_id).await?;
    schedule.set_days(store_id, days);

    let changes = fieldroute_db::save_weekly_schedule(pool, supervisor_id, &schedule).await?;
    print_changes(&changes);
    Ok(())
}

fn print_changes(changes: &ChangeSet) {
    if changes.is_empty() {
        println!("no changes");
        return;
    }
    for change in changes.iter() {
        println!(
            "{}: +[{}] -[{}]",
            change.store_id,
            join_days(change.to_add.iter()),
            join_days(change.to_remove.iter())
        );
    }
    println!(
        "{} visit(s) added, {} removed",
        changes.additions(),
        changes.removals()
    );
}

fn join_days<'a>(days: impl Iterator<Item = &'a Weekday>) -> String {
    days.map(|d| d.as_str()).collect::<Vec<_>>().join(",")
}
