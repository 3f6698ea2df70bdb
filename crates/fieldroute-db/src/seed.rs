use std::collections::BTreeSet;

use fieldroute_core::{CatalogFile, ChangeSet, ScheduleChange};
use sqlx::PgPool;

use crate::schedule::{apply_change_set, load_weekly_schedule};
use crate::DbError;

/// Counts reported after a catalog seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub managers: usize,
    pub supervisors: usize,
    /// Initial visits that were not already planned.
    pub visits_added: usize,
}

/// Upsert the reference catalog: stores, managers, supervisors, and reporting
/// links. Initial visit plans only add days that are missing; days planned
/// since the last seed are never removed, so re-seeding is safe.
///
/// All writes run inside a single transaction; if any fails the entire seed
/// is rolled back.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &CatalogFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for store in &catalog.stores {
        sqlx::query(
            "INSERT INTO stores (id, name, tier, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 tier = EXCLUDED.tier, \
                 latitude = EXCLUDED.latitude, \
                 longitude = EXCLUDED.longitude, \
                 updated_at = NOW()",
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(store.tier)
        .bind(store.latitude)
        .bind(store.longitude)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from_write)?;
        summary.stores += 1;
    }

    for manager in &catalog.managers {
        sqlx::query(
            "INSERT INTO managers (id, name, email) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 email = EXCLUDED.email, \
                 updated_at = NOW()",
        )
        .bind(&manager.id)
        .bind(&manager.name)
        .bind(&manager.email)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from_write)?;
        summary.managers += 1;
    }

    for supervisor in &catalog.supervisors {
        sqlx::query(
            "INSERT INTO supervisors (id, name, email) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 email = EXCLUDED.email, \
                 updated_at = NOW()",
        )
        .bind(&supervisor.id)
        .bind(&supervisor.name)
        .bind(&supervisor.email)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from_write)?;

        sqlx::query(
            "INSERT INTO reporting_links (supervisor_id, manager_id) VALUES ($1, $2) \
             ON CONFLICT (supervisor_id) DO UPDATE SET manager_id = EXCLUDED.manager_id",
        )
        .bind(&supervisor.id)
        .bind(&supervisor.manager_id)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from_write)?;
        summary.supervisors += 1;
    }

    for (supervisor_id, planned) in catalog.initial_schedules() {
        let current = load_weekly_schedule(&mut *tx, &supervisor_id).await?;
        let changes: Vec<ScheduleChange> = planned
            .iter()
            .filter_map(|(store_id, days)| {
                let missing: BTreeSet<_> =
                    days.difference(current.days(store_id)).copied().collect();
                (!missing.is_empty()).then(|| ScheduleChange {
                    store_id: store_id.to_string(),
                    to_add: missing,
                    to_remove: BTreeSet::new(),
                })
            })
            .collect();
        let changes = ChangeSet { changes };
        summary.visits_added += changes.additions();
        apply_change_set(&mut tx, &supervisor_id, &changes).await?;
    }

    tx.commit().await.map_err(DbError::from_write)?;
    Ok(summary)
}
