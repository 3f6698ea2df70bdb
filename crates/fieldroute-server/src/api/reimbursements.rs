use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use fieldroute_core::{NewReimbursement, Reimbursement, ReimbursementSummary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, validation_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitReimbursementRequest {
    /// Expense date; today (UTC) when omitted.
    pub date: Option<NaiveDate>,
    pub amount: i64,
    pub category: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitReimbursementResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryResponse {
    pub items: Vec<Reimbursement>,
    pub summary: ReimbursementSummary,
}

/// POST /api/v1/supervisors/{supervisor_id}/reimbursements
pub(super) async fn submit_reimbursement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
    Json(body): Json<SubmitReimbursementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReimbursementResponse>>), ApiError> {
    let rid = &req_id.0;

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());
    let claim = NewReimbursement::new(
        supervisor_id.as_str(),
        date,
        body.amount,
        &body.category,
        body.comment.as_deref(),
    )
    .map_err(|e| validation_error(rid, &e))?;

    let id = fieldroute_db::insert_reimbursement(&state.pool, &claim)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        supervisor_id = %supervisor_id,
        reimbursement_id = %id,
        amount = claim.amount,
        category = %claim.category,
        "reimbursement recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            SubmitReimbursementResponse { id },
            req_id.0.clone(),
        )),
    ))
}

/// GET /api/v1/supervisors/{supervisor_id}/reimbursements
pub(super) async fn list_reimbursements(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(supervisor_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponse>>, ApiError> {
    let limit = normalize_limit(query.limit, state.history_default_limit);
    let items = fieldroute_db::list_recent_reimbursements(&state.pool, &supervisor_id, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let summary = ReimbursementSummary::from_records(&items);
    Ok(Json(ApiResponse::new(
        HistoryResponse { items, summary },
        req_id.0,
    )))
}
