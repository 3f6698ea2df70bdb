use axum::{extract::State, Extension, Json};
use fieldroute_core::Store;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// GET /api/v1/stores: the store catalog, for picking stores to add to a
/// route.
pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Store>>>, ApiError> {
    let rows = fieldroute_db::list_stores(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(Store::from).collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}
