use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use fieldroute_core::DEFAULT_HISTORY_LIMIT;
use tower::ServiceExt;

const CATALOG: &str = include_str!("../../../../config/catalog.yaml");

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None, 20), 20);
    assert_eq!(normalize_limit(Some(0), 20), 1);
    assert_eq!(normalize_limit(Some(-5), 20), 1);
    assert_eq!(normalize_limit(Some(1_000), 20), MAX_HISTORY_LIMIT);
    assert_eq!(normalize_limit(Some(25), 20), 25);
}

#[test]
fn error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("not_found", StatusCode::NOT_FOUND),
        ("conflict", StatusCode::CONFLICT),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("unavailable", StatusCode::SERVICE_UNAVAILABLE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[test]
fn db_errors_are_classified() {
    let not_found = map_db_error(
        "req-1".to_string(),
        &DbError::NotFound {
            entity: "store",
            id: "sala999".to_string(),
        },
    );
    assert_eq!(not_found.error.code, "not_found");
    assert_eq!(not_found.error.message, "store 'sala999' not found");

    let unavailable = map_db_error(
        "req-2".to_string(),
        &DbError::from(sqlx::Error::PoolTimedOut),
    );
    assert_eq!(unavailable.error.code, "unavailable");

    let other = map_db_error("req-3".to_string(), &DbError::from(sqlx::Error::RowNotFound));
    assert_eq!(other.error.code, "internal_error");
}

#[test]
fn validation_error_names_the_field() {
    let err = validation_error("req-1", &CoreError::InvalidAmount { amount: 0 });
    assert_eq!(err.error.code, "validation_error");
    assert!(err.error.message.starts_with("amount: "));
}

// -------------------------------------------------------------------------
// Route tests (with DB)
// -------------------------------------------------------------------------

async fn seed(pool: &sqlx::PgPool) {
    let catalog = fieldroute_core::parse_catalog(CATALOG).expect("catalog parses");
    fieldroute_db::seed_catalog(pool, &catalog)
        .await
        .expect("seed catalog");
}

fn app(pool: sqlx::PgPool) -> Router {
    let auth = AuthState::from_keys("", true).expect("auth");
    build_app(
        AppState {
            pool,
            history_default_limit: DEFAULT_HISTORY_LIMIT,
        },
        auth,
        default_rate_limit_state(),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_ok_and_echoes_request_id(pool: sqlx::PgPool) {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "req-health")
        .body(Body::empty())
        .expect("request");

    let (status, json) = send(app(pool), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["database"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[sqlx::test(migrations = "../../migrations")]
async fn protected_routes_require_bearer_token(pool: sqlx::PgPool) {
    let auth = AuthState::from_keys("secret-token", false).expect("auth");
    let app = build_app(
        AppState {
            pool,
            history_default_limit: DEFAULT_HISTORY_LIMIT,
        },
        auth,
        default_rate_limit_state(),
    );

    let (status, json) = send(app.clone(), get("/api/v1/stores")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "unauthorized");

    let request = Request::builder()
        .uri("/api/v1/stores")
        .header(header::AUTHORIZATION, "Bearer secret-token")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn route_is_grouped_by_day_with_pins(pool: sqlx::PgPool) {
    seed(&pool).await;

    let (status, json) = send(app(pool), get("/api/v1/supervisors/s41861921/route")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["visit_count"], 20);

    let days = json["data"]["days"].as_array().expect("days array");
    assert_eq!(days.len(), 6);
    assert_eq!(days[0]["weekday"], "MONDAY");
    assert_eq!(days[0]["visit_count"], 4);
    // sala003 has no coordinates: listed as a stop, left off the map.
    assert_eq!(days[0]["stops"].as_array().map(Vec::len), Some(4));
    assert_eq!(days[0]["pins"].as_array().map(Vec::len), Some(3));
    // Monday tiers: 3, 4, 4, 3.
    assert!((days[0]["mean_tier"].as_f64().unwrap() - 3.5).abs() < 1e-9);
}

#[sqlx::test(migrations = "../../migrations")]
async fn route_of_unknown_supervisor_is_empty(pool: sqlx::PgPool) {
    let (status, json) = send(app(pool), get("/api/v1/supervisors/s-unknown/route")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["days"].as_array().map(Vec::len), Some(0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn reimbursement_submit_then_history(pool: sqlx::PgPool) {
    let app = app(pool);
    let uri = "/api/v1/supervisors/s41861921/reimbursements";

    for amount in [15_000, 8_500] {
        let body = serde_json::json!({
            "date": "2026-02-03",
            "amount": amount,
            "category": "TRANSPORTE",
            "comment": "Taxi",
        });
        let (status, json) = send(app.clone(), json_request(Method::POST, uri, &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json["data"]["id"].is_string());
    }

    let (status, json) = send(app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["data"]["items"][0]["category"], "TRANSPORT");
    assert_eq!(json["data"]["summary"]["total"], 23_500);
    assert_eq!(json["data"]["summary"]["mean"], 11_750);
    assert_eq!(json["data"]["summary"]["count"], 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn invalid_reimbursements_are_rejected(pool: sqlx::PgPool) {
    let app = app(pool);
    let uri = "/api/v1/supervisors/s41861921/reimbursements";

    let zero = serde_json::json!({ "amount": 0, "category": "FOOD" });
    let (status, json) = send(app.clone(), json_request(Method::POST, uri, &zero)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let unknown = serde_json::json!({ "amount": 1_500, "category": "UNKNOWN" });
    let (status, _) = send(app.clone(), json_request(Method::POST, uri, &unknown)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(app, get(uri)).await;
    assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
    assert!(json["data"]["summary"]["mean"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_edit_round_trip(pool: sqlx::PgPool) {
    seed(&pool).await;
    let app = app(pool);
    let uri = "/api/v1/supervisors/s3048eab6/schedule";

    let (status, json) = send(app.clone(), get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let stores = json["data"]["stores"].as_array().expect("stores");
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["store_id"], "sala006");

    let edit = serde_json::json!({
        "stores": {
            "sala006": ["lunes"],
            "sala007": ["Viernes"],
        }
    });
    let (status, json) = send(app.clone(), json_request(Method::PUT, uri, &edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["additions"], 1);
    assert_eq!(json["data"]["removals"], 1);
    assert_eq!(json["data"]["changes"].as_array().map(Vec::len), Some(2));

    let (_, json) = send(app, get(uri)).await;
    let stores = json["data"]["stores"].as_array().expect("stores");
    assert_eq!(stores.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_with_sunday_is_a_validation_error(pool: sqlx::PgPool) {
    seed(&pool).await;
    let app = app(pool);
    let uri = "/api/v1/supervisors/s3048eab6/schedule";

    let edit = serde_json::json!({ "stores": { "sala006": ["domingo"] } });
    let (status, json) = send(app.clone(), json_request(Method::PUT, uri, &edit)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (_, json) = send(app, get(uri)).await;
    let stores = json["data"]["stores"].as_array().expect("stores");
    assert_eq!(stores.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_of_unknown_supervisor_is_404(pool: sqlx::PgPool) {
    let app = app(pool);
    let (status, _) = send(app.clone(), get("/api/v1/supervisors/s-unknown/schedule")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let edit = serde_json::json!({ "stores": {} });
    let (status, json) = send(
        app,
        json_request(Method::PUT, "/api/v1/supervisors/s-unknown/schedule", &edit),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_edit_with_unknown_store_is_404(pool: sqlx::PgPool) {
    seed(&pool).await;
    let edit = serde_json::json!({ "stores": { "sala999": ["MONDAY"] } });
    let (status, json) = send(
        app(pool),
        json_request(Method::PUT, "/api/v1/supervisors/s3048eab6/schedule", &edit),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["message"], "store 'sala999' not found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn manager_and_roster_lookups(pool: sqlx::PgPool) {
    seed(&pool).await;
    let app = app(pool);

    let (status, json) = send(app.clone(), get("/api/v1/supervisors/s41861921/manager")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], "zce0bf2f8");

    let (status, _) = send(app.clone(), get("/api/v1/supervisors/s-unknown/manager")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(app, get("/api/v1/managers/zce0bf2f8/supervisors")).await;
    assert_eq!(status, StatusCode::OK);
    let roster = json["data"].as_array().expect("roster");
    assert_eq!(roster.len(), 3);
    assert_eq!(roster[1]["supervisor_id"], "s41861921");
    assert_eq!(roster[1]["visit_count"], 20);
}

#[sqlx::test(migrations = "../../migrations")]
async fn store_catalog_is_listed(pool: sqlx::PgPool) {
    seed(&pool).await;
    let (status, json) = send(app(pool), get("/api/v1/stores")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(7));
}
