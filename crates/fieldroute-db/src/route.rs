//! Route query: a supervisor's planned visits joined with store attributes.

use fieldroute_core::{Coordinates, RouteStop, Weekday};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteStopRow {
    pub weekday: i16,
    pub visit_order: i32,
    pub store_id: String,
    pub store_name: String,
    pub tier: Option<i16>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TryFrom<RouteStopRow> for RouteStop {
    type Error = DbError;

    fn try_from(row: RouteStopRow) -> Result<Self, Self::Error> {
        Ok(RouteStop {
            weekday: Weekday::from_number(row.weekday)?,
            visit_order: row.visit_order,
            coordinates: Coordinates::from_parts(row.latitude, row.longitude),
            store_id: row.store_id,
            store_name: row.store_name,
            tier: row.tier,
        })
    }
}

/// Returns every planned stop for a supervisor, Monday first, then by visit
/// order within each day.
///
/// An unknown supervisor and a supervisor with nothing planned both yield an
/// empty list; an unreachable database yields [`DbError::Unavailable`].
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored weekday is out of range.
pub async fn list_route_stops(
    pool: &PgPool,
    supervisor_id: &str,
) -> Result<Vec<RouteStop>, DbError> {
    let rows = sqlx::query_as::<_, RouteStopRow>(
        "SELECT v.weekday, v.visit_order, s.id AS store_id, s.name AS store_name, \
                s.tier, s.latitude, s.longitude \
         FROM planned_visits v \
         JOIN stores s ON s.id = v.store_id \
         WHERE v.supervisor_id = $1 \
         ORDER BY v.weekday, v.visit_order",
    )
    .bind(supervisor_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(RouteStop::try_from).collect()
}
