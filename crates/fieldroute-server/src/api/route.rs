use axum::{
    extract::{Path, State},
    Extension, Json,
};
use fieldroute_core::{group_by_day, DailyRoute, MapPin, RouteStop, Weekday};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct RouteResponse {
    pub supervisor_id: String,
    pub visit_count: usize,
    pub days: Vec<RouteDayItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct RouteDayItem {
    pub weekday: Weekday,
    pub visit_count: usize,
    pub mean_tier: Option<f64>,
    pub stops: Vec<RouteStop>,
    /// Stops with known coordinates; the rest stay listed in `stops`.
    pub pins: Vec<MapPin>,
}

impl From<DailyRoute> for RouteDayItem {
    fn from(day: DailyRoute) -> Self {
        Self {
            weekday: day.weekday,
            visit_count: day.visit_count(),
            mean_tier: day.mean_tier(),
            pins: day.map_pins(),
            stops: day.stops,
        }
    }
}

/// GET /api/v1/supervisors/{supervisor_id}/route
///
/// An unknown supervisor gets an empty route rather than a 404.
pub(super) async fn get_route(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<ApiResponse<RouteResponse>>, ApiError> {
    let stops = fieldroute_db::list_route_stops(&state.pool, &supervisor_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let visit_count = stops.len();
    let days = group_by_day(stops)
        .into_iter()
        .map(RouteDayItem::from)
        .collect();

    Ok(Json(ApiResponse::new(
        RouteResponse {
            supervisor_id,
            visit_count,
            days,
        },
        req_id.0,
    )))
}
