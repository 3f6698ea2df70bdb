//! Append-only reimbursement ledger.

use chrono::{DateTime, NaiveDate, Utc};
use fieldroute_core::{Category, NewReimbursement, Reimbursement};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReimbursementRow {
    pub id: Uuid,
    pub supervisor_id: String,
    pub expense_date: NaiveDate,
    pub amount: i64,
    pub category: String,
    pub comment: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl TryFrom<ReimbursementRow> for Reimbursement {
    type Error = DbError;

    fn try_from(row: ReimbursementRow) -> Result<Self, Self::Error> {
        Ok(Reimbursement {
            id: row.id,
            supervisor_id: row.supervisor_id,
            date: row.expense_date,
            amount: row.amount,
            category: row.category.parse::<Category>()?,
            comment: row.comment,
            recorded_at: row.recorded_at,
        })
    }
}

/// Appends a validated claim to the ledger and returns its id.
///
/// Claims are never merged: submitting identical values twice stores two
/// rows, each with its own id.
///
/// # Errors
///
/// Returns [`DbError::PersistenceFailure`] if the insert is rejected, or
/// [`DbError::Unavailable`] if the database cannot be reached.
pub async fn insert_reimbursement(
    pool: &PgPool,
    claim: &NewReimbursement,
) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO reimbursements \
             (id, supervisor_id, expense_date, amount, category, comment) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(claim.id)
    .bind(&claim.supervisor_id)
    .bind(claim.date)
    .bind(claim.amount)
    .bind(claim.category.as_str())
    .bind(&claim.comment)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_write)?;

    Ok(id)
}

/// Returns a supervisor's most recent claims, newest expense date first.
///
/// Claims sharing an expense date are ordered by submission time, newest
/// first. `limit` must be positive; callers normalize it.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored category is unknown.
pub async fn list_recent_reimbursements(
    pool: &PgPool,
    supervisor_id: &str,
    limit: i64,
) -> Result<Vec<Reimbursement>, DbError> {
    let rows = sqlx::query_as::<_, ReimbursementRow>(
        "SELECT id, supervisor_id, expense_date, amount, category, comment, recorded_at \
         FROM reimbursements \
         WHERE supervisor_id = $1 \
         ORDER BY expense_date DESC, recorded_at DESC, id \
         LIMIT $2",
    )
    .bind(supervisor_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Reimbursement::try_from).collect()
}
