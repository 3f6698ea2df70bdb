//! Roster handlers: who a supervisor reports to, and who reports to a manager.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ManagerItem {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RosterItem {
    pub supervisor_id: String,
    pub name: String,
    pub email: Option<String>,
    pub visit_count: i64,
}

/// GET /api/v1/supervisors/{supervisor_id}/manager
pub(super) async fn get_manager(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<ApiResponse<ManagerItem>>, ApiError> {
    let row = fieldroute_db::get_manager_of_supervisor(&state.pool, &supervisor_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("supervisor '{supervisor_id}' has no reporting manager"),
            )
        })?;

    Ok(Json(ApiResponse::new(
        ManagerItem {
            id: row.id,
            name: row.name,
            email: row.email,
        },
        req_id.0,
    )))
}

/// GET /api/v1/managers/{manager_id}/supervisors
pub(super) async fn list_roster(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(manager_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<RosterItem>>>, ApiError> {
    let rows = fieldroute_db::list_supervisors_for_manager(&state.pool, &manager_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| RosterItem {
            supervisor_id: row.supervisor_id,
            name: row.name,
            email: row.email,
            visit_count: row.visit_count,
        })
        .collect();

    Ok(Json(ApiResponse::new(data, req_id.0)))
}
