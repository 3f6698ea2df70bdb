//! `reimbursements` subcommands.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use fieldroute_core::{NewReimbursement, ReimbursementSummary};

#[derive(Debug, Subcommand)]
pub enum ReimbursementCommands {
    /// Record an expense claim
    Submit {
        #[arg(long)]
        supervisor: String,
        /// Amount in the smallest currency unit (CLP)
        #[arg(long)]
        amount: i64,
        /// TRANSPORT, FOOD, MATERIALS or OTHER (Spanish names accepted)
        #[arg(long)]
        category: String,
        /// Expense date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show a supervisor's most recent claims
    List {
        #[arg(long)]
        supervisor: String,
        /// Maximum number of claims to show
        #[arg(long)]
        limit: Option<i64>,
    },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    default_limit: i64,
    command: ReimbursementCommands,
) -> anyhow::Result<()> {
    match command {
        ReimbursementCommands::Submit {
            supervisor,
            amount,
            category,
            date,
            comment,
        } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let claim =
                NewReimbursement::new(supervisor, date, amount, &category, comment.as_deref())?;
            let id = fieldroute_db::insert_reimbursement(pool, &claim).await?;
            tracing::info!(
                supervisor_id = %claim.supervisor_id,
                reimbursement_id = %id,
                "reimbursement recorded"
            );
            println!("recorded {id}");
            Ok(())
        }
        ReimbursementCommands::List { supervisor, limit } => {
            let limit = limit.unwrap_or(default_limit).max(1);
            run_list(pool, &supervisor, limit).await
        }
    }
}

async fn run_list(pool: &sqlx::PgPool, supervisor_id: &str, limit: i64) -> anyhow::Result<()> {
    let records = fieldroute_db::list_recent_reimbursements(pool, supervisor_id, limit).await?;
    if records.is_empty() {
        println!("no reimbursements for supervisor {supervisor_id}");
        return Ok(());
    }

    println!("{:<12}{:>10}  {:<11}COMMENT", "DATE", "AMOUNT", "CATEGORY");
    for record in &records {
        let comment = record.comment.clone().unwrap_or_else(super::dash);
        println!(
            "{:<12}{:>10}  {:<11}{}",
            record.date.format("%Y-%m-%d"),
            record.amount,
            record.category.as_str(),
            comment
        );
    }

    let summary = ReimbursementSummary::from_records(&records);
    let mean = summary.mean.map_or_else(super::dash, |m| m.to_string());
    println!();
    println!(
        "total {}  mean {}  count {}",
        summary.total, mean, summary.count
    );
    Ok(())
}
