//! Offline unit tests for fieldroute-db pool configuration and row types.
//! These tests do not require a live database connection.

use fieldroute_core::{AppConfig, Environment, Store, Weekday};
use fieldroute_db::{PoolConfig, RosterRow, ScheduleMatrixRow, StoreRow};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        catalog_path: PathBuf::from("./config/catalog.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        history_default_limit: 20,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn store_row_converts_to_domain_store() {
    let store = Store::from(StoreRow {
        id: "sala001".to_string(),
        name: "TOT FLO WALKER MARTINEZ / 55".to_string(),
        tier: Some(3),
        latitude: Some(-33.52),
        longitude: Some(-70.59),
    });

    let coords = store.coordinates.expect("both coordinates present");
    assert!((coords.latitude - -33.52).abs() < f64::EPSILON);
    assert!((coords.longitude - -70.59).abs() < f64::EPSILON);
}

/// Compile-time smoke test: confirm that [`RosterRow`] carries the visit count
/// as a 64-bit integer, matching `COUNT(*)`.
#[test]
fn roster_row_has_expected_fields() {
    let row = RosterRow {
        supervisor_id: "s41861921".to_string(),
        name: "Harry Urra".to_string(),
        email: None,
        visit_count: 20_i64,
    };
    assert_eq!(row.visit_count, 20);
}

#[test]
fn schedule_matrix_row_holds_a_day_set() {
    let row = ScheduleMatrixRow {
        store_id: "sala004".to_string(),
        store_name: "JUMBO KENNEDY".to_string(),
        days: BTreeSet::from([Weekday::Thursday, Weekday::Tuesday]),
    };
    let days: Vec<_> = row.days.iter().copied().collect();
    assert_eq!(days, vec![Weekday::Tuesday, Weekday::Thursday]);
}
