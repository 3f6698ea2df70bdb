//! Persistence for the weekly visit matrix.
//!
//! Saving an edited matrix never rewrites the whole schedule: the stored
//! matrix is diffed against the edit and only the resulting change-set is
//! written, inside one transaction.

use std::collections::{BTreeMap, BTreeSet};

use fieldroute_core::{compute_change_set, ChangeSet, ScheduleChange, Weekday, WeeklySchedule};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::DbError;

/// One matrix row: a scheduled store and the days it is visited.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMatrixRow {
    pub store_id: String,
    pub store_name: String,
    pub days: BTreeSet<Weekday>,
}

#[derive(Debug, sqlx::FromRow)]
struct PlannedVisitRow {
    store_id: String,
    store_name: String,
    weekday: i16,
}

/// Loads the stored matrix for a supervisor.
///
/// Accepts any executor so it can run inside the save transaction.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored weekday is out of range.
pub async fn load_weekly_schedule<'e, E>(
    executor: E,
    supervisor_id: &str,
) -> Result<WeeklySchedule, DbError>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, (String, i16)>(
        "SELECT store_id, weekday FROM planned_visits WHERE supervisor_id = $1",
    )
    .bind(supervisor_id)
    .fetch_all(executor)
    .await?;

    let mut schedule = WeeklySchedule::new();
    for (store_id, weekday) in rows {
        schedule.insert(store_id, Weekday::from_number(weekday)?);
    }
    Ok(schedule)
}

/// Returns the matrix as displayed to a manager: one row per scheduled store,
/// ordered by store name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored weekday is out of range.
pub async fn list_schedule_matrix(
    pool: &PgPool,
    supervisor_id: &str,
) -> Result<Vec<ScheduleMatrixRow>, DbError> {
    let rows = sqlx::query_as::<_, PlannedVisitRow>(
        "SELECT v.store_id, s.name AS store_name, v.weekday \
         FROM planned_visits v \
         JOIN stores s ON s.id = v.store_id \
         WHERE v.supervisor_id = $1 \
         ORDER BY s.name, v.store_id, v.weekday",
    )
    .bind(supervisor_id)
    .fetch_all(pool)
    .await?;

    let mut matrix: Vec<ScheduleMatrixRow> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        let day = Weekday::from_number(row.weekday)?;
        if let Some(&idx) = positions.get(&row.store_id) {
            matrix[idx].days.insert(day);
        } else {
            positions.insert(row.store_id.clone(), matrix.len());
            matrix.push(ScheduleMatrixRow {
                store_id: row.store_id,
                store_name: row.store_name,
                days: BTreeSet::from([day]),
            });
        }
    }
    Ok(matrix)
}

/// Saves an edited matrix for a supervisor and returns the change-set that
/// was applied.
///
/// The stored matrix is re-read inside the transaction, so the diff is taken
/// against what is actually persisted. Concurrent saves for the same
/// supervisor are serialized on the supervisor row; the last one to commit
/// wins. An edit equal to the stored matrix writes nothing.
///
/// # Errors
///
/// - [`DbError::NotFound`] if the supervisor is unknown, or a store gaining
///   days is not in the catalog. Nothing is written.
/// - [`DbError::PersistenceFailure`] if a write is rejected; the transaction
///   is rolled back and the stored matrix is unchanged.
/// - [`DbError::Unavailable`] if the database cannot be reached.
pub async fn save_weekly_schedule(
    pool: &PgPool,
    supervisor_id: &str,
    after: &WeeklySchedule,
) -> Result<ChangeSet, DbError> {
    let mut tx = pool.begin().await?;

    let locked: Option<String> =
        sqlx::query_scalar("SELECT id FROM supervisors WHERE id = $1 FOR UPDATE")
            .bind(supervisor_id)
            .fetch_optional(&mut *tx)
            .await?;
    if locked.is_none() {
        return Err(DbError::not_found("supervisor", supervisor_id));
    }

    let before = load_weekly_schedule(&mut *tx, supervisor_id).await?;
    let changes = compute_change_set(&before, after);
    if changes.is_empty() {
        tx.commit().await.map_err(DbError::from_write)?;
        return Ok(changes);
    }

    let gaining: Vec<String> = changes
        .iter()
        .filter(|c| !c.to_add.is_empty())
        .map(|c| c.store_id.clone())
        .collect();
    if !gaining.is_empty() {
        let known: Vec<String> =
            sqlx::query_scalar("SELECT id FROM stores WHERE id = ANY($1::text[])")
                .bind(&gaining)
                .fetch_all(&mut *tx)
                .await?;
        if let Some(missing) = gaining.iter().find(|id| !known.contains(id)) {
            return Err(DbError::not_found("store", missing.clone()));
        }
    }

    apply_change_set(&mut tx, supervisor_id, &changes).await?;
    tx.commit().await.map_err(DbError::from_write)?;

    Ok(changes)
}

/// Writes a change-set inside an open transaction.
///
/// Removals run first. Each added visit is appended to the end of its day:
/// `visit_order` is one past the highest order already planned for that
/// (supervisor, weekday), with additions for the same day numbered in store
/// id order. Removing a visit leaves a gap; orders are never compacted.
///
/// # Errors
///
/// Returns [`DbError::PersistenceFailure`] if a statement is rejected, or
/// [`DbError::Unavailable`] if the connection is lost.
pub async fn apply_change_set(
    tx: &mut Transaction<'_, Postgres>,
    supervisor_id: &str,
    changes: &ChangeSet,
) -> Result<(), DbError> {
    let (remove_stores, remove_days) = flatten(changes, |c| &c.to_remove);
    let (add_stores, add_days) = flatten(changes, |c| &c.to_add);

    if !remove_stores.is_empty() {
        sqlx::query(
            "DELETE FROM planned_visits v \
             USING UNNEST($2::text[], $3::int2[]) AS d(store_id, weekday) \
             WHERE v.supervisor_id = $1 \
               AND v.store_id = d.store_id \
               AND v.weekday = d.weekday",
        )
        .bind(supervisor_id)
        .bind(&remove_stores)
        .bind(&remove_days)
        .execute(&mut **tx)
        .await
        .map_err(DbError::from_write)?;
    }

    if !add_stores.is_empty() {
        sqlx::query(
            "INSERT INTO planned_visits (supervisor_id, store_id, weekday, visit_order) \
             SELECT $1, n.store_id, n.weekday, \
                    (COALESCE(( \
                        SELECT MAX(p.visit_order) FROM planned_visits p \
                        WHERE p.supervisor_id = $1 AND p.weekday = n.weekday \
                     ), 0) \
                     + ROW_NUMBER() OVER (PARTITION BY n.weekday ORDER BY n.ord))::int \
             FROM UNNEST($2::text[], $3::int2[]) WITH ORDINALITY AS n(store_id, weekday, ord)",
        )
        .bind(supervisor_id)
        .bind(&add_stores)
        .bind(&add_days)
        .execute(&mut **tx)
        .await
        .map_err(DbError::from_write)?;
    }

    Ok(())
}

/// Splits one side of a change-set into parallel columns for UNNEST binding.
fn flatten<'a, F>(changes: &'a ChangeSet, side: F) -> (Vec<String>, Vec<i16>)
where
    F: Fn(&'a ScheduleChange) -> &'a BTreeSet<Weekday>,
{
    let mut stores = Vec::new();
    let mut days = Vec::new();
    for change in changes.iter() {
        for day in side(change) {
            stores.push(change.store_id.clone());
            days.push(day.number());
        }
    }
    (stores, days)
}
