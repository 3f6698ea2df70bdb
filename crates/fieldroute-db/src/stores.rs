//! Database operations for the `stores` catalog.

use fieldroute_core::{Coordinates, Store};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: String,
    pub name: String,
    pub tier: Option<i16>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            coordinates: Coordinates::from_parts(row.latitude, row.longitude),
            id: row.id,
            name: row.name,
            tier: row.tier,
        }
    }
}

/// Returns the full store catalog ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Unavailable`] if the database cannot be reached, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, tier, latitude, longitude \
         FROM stores \
         ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single store by id, or `None` if it is not in the catalog.
///
/// # Errors
///
/// Returns [`DbError::Unavailable`] if the database cannot be reached, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_store(pool: &PgPool, id: &str) -> Result<Option<StoreRow>, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, tier, latitude, longitude FROM stores WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
