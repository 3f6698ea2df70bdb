//! Schedule editor handlers.
//!
//! The editor loads the matrix, the manager toggles days (or adds stores from
//! the catalog), and the full edited matrix is sent back. Only the difference
//! against what is stored gets written.

use std::collections::BTreeSet;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use fieldroute_core::{ChangeSet, Weekday, WeeklySchedule};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ScheduleRowItem {
    pub store_id: String,
    pub store_name: String,
    pub days: BTreeSet<Weekday>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScheduleResponse {
    pub supervisor_id: String,
    pub stores: Vec<ScheduleRowItem>,
}

/// Edited matrix: store id → checked days. Stores left out, or sent with no
/// days, lose all their visits.
#[derive(Debug, Deserialize)]
pub(super) struct SaveScheduleRequest {
    pub stores: WeeklySchedule,
}

#[derive(Debug, Serialize)]
pub(super) struct SaveScheduleResponse {
    pub supervisor_id: String,
    pub additions: usize,
    pub removals: usize,
    #[serde(flatten)]
    pub changes: ChangeSet,
}

/// GET /api/v1/supervisors/{supervisor_id}/schedule
pub(super) async fn get_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, ApiError> {
    let supervisor = fieldroute_db::get_supervisor(&state.pool, &supervisor_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if supervisor.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("supervisor '{supervisor_id}' not found"),
        ));
    }

    let rows = fieldroute_db::list_schedule_matrix(&state.pool, &supervisor_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let stores = rows
        .into_iter()
        .map(|row| ScheduleRowItem {
            store_id: row.store_id,
            store_name: row.store_name,
            days: row.days,
        })
        .collect();

    Ok(Json(ApiResponse::new(
        ScheduleResponse {
            supervisor_id,
            stores,
        },
        req_id.0,
    )))
}

/// PUT /api/v1/supervisors/{supervisor_id}/schedule
pub(super) async fn save_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
    body: Result<Json<SaveScheduleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SaveScheduleResponse>>, ApiError> {
    // Unknown day names surface here, so report them like other bad input.
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            rejection.body_text(),
        )
    })?;
    let changes = fieldroute_db::save_weekly_schedule(&state.pool, &supervisor_id, &body.stores)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(
        supervisor_id = %supervisor_id,
        stores_changed = changes.len(),
        visits_added = changes.additions(),
        visits_removed = changes.removals(),
        "schedule saved"
    );

    Ok(Json(ApiResponse::new(
        SaveScheduleResponse {
            supervisor_id,
            additions: changes.additions(),
            removals: changes.removals(),
            changes,
        },
        req_id.0,
    )))
}
