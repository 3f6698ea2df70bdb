//! Supervisors, managers, and the reporting links between them.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `supervisors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupervisorRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// A row from the `managers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ManagerRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// A supervisor on a manager's team with their current planned visit count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RosterRow {
    pub supervisor_id: String,
    pub name: String,
    pub email: Option<String>,
    /// Computed from `planned_visits` on every read.
    pub visit_count: i64,
}

/// Returns a supervisor by id, or `None` if unknown.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn get_supervisor(pool: &PgPool, id: &str) -> Result<Option<SupervisorRow>, DbError> {
    let row = sqlx::query_as::<_, SupervisorRow>(
        "SELECT id, name, email FROM supervisors WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the manager a supervisor currently reports to.
///
/// `None` covers both an unknown supervisor and one with no reporting link.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn get_manager_of_supervisor(
    pool: &PgPool,
    supervisor_id: &str,
) -> Result<Option<ManagerRow>, DbError> {
    let row = sqlx::query_as::<_, ManagerRow>(
        "SELECT m.id, m.name, m.email \
         FROM reporting_links r \
         JOIN managers m ON m.id = r.manager_id \
         WHERE r.supervisor_id = $1",
    )
    .bind(supervisor_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the supervisors reporting to `manager_id`, ordered by name.
///
/// An unknown manager yields an empty list.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn list_supervisors_for_manager(
    pool: &PgPool,
    manager_id: &str,
) -> Result<Vec<RosterRow>, DbError> {
    let rows = sqlx::query_as::<_, RosterRow>(
        "SELECT s.id AS supervisor_id, s.name, s.email, \
                COUNT(v.store_id) AS visit_count \
         FROM reporting_links r \
         JOIN supervisors s ON s.id = r.supervisor_id \
         LEFT JOIN planned_visits v ON v.supervisor_id = s.id \
         WHERE r.manager_id = $1 \
         GROUP BY s.id, s.name, s.email \
         ORDER BY s.name, s.id",
    )
    .bind(manager_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
