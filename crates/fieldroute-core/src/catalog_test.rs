use std::path::Path;

use super::*;

const VALID: &str = r"
stores:
  - id: sala001
    name: TOT FLO WALKER MARTINEZ / 55
    tier: 3
    latitude: -33.52
    longitude: -70.59
  - id: sala002
    name: S10 ROJAS MAGALLANES / 80
    tier: 5
managers:
  - id: zce0bf2f8
    name: Ricardo Millar
supervisors:
  - id: s41861921
    name: Harry Urra
    email: harry.urra@example.com
    manager_id: zce0bf2f8
visits:
  - supervisor_id: s41861921
    store_id: sala001
    days: [MONDAY, WEDNESDAY]
  - supervisor_id: s41861921
    store_id: sala002
    days: [LUNES]
";

#[test]
fn parses_a_valid_catalog() {
    let catalog = parse_catalog(VALID).expect("valid catalog");
    assert_eq!(catalog.stores.len(), 2);
    assert_eq!(catalog.managers.len(), 1);
    assert_eq!(catalog.supervisors[0].manager_id, "zce0bf2f8");

    let store = catalog.stores[0].to_store();
    assert_eq!(store.tier, Some(3));
    assert!(store.coordinates.is_some());
    assert!(catalog.stores[1].to_store().coordinates.is_none());
}

#[test]
fn initial_schedules_group_by_supervisor() {
    let catalog = parse_catalog(VALID).unwrap();
    let schedules = catalog.initial_schedules();
    let harry = schedules.get("s41861921").expect("schedule for s41861921");
    assert_eq!(harry.visit_count(), 3);
    assert!(harry.contains("sala001", Weekday::Wednesday));
    assert!(harry.contains("sala002", Weekday::Monday));
}

#[test]
fn stores_only_catalog_is_valid() {
    let yaml = "stores:\n  - id: a\n    name: A\n";
    let catalog = parse_catalog(yaml).unwrap();
    assert!(catalog.supervisors.is_empty());
    assert!(catalog.initial_schedules().is_empty());
}

#[test]
fn rejects_duplicate_store_ids() {
    let yaml = "stores:\n  - id: a\n    name: A\n  - id: a\n    name: B\n";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate store id")),
        "got {err:?}"
    );
}

#[test]
fn rejects_tier_out_of_range() {
    let yaml = "stores:\n  - id: a\n    name: A\n    tier: 6\n";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("tier")),
        "got {err:?}"
    );
}

#[test]
fn rejects_half_coordinates() {
    let yaml = "stores:\n  - id: a\n    name: A\n    latitude: -33.4\n";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("latitude and longitude")),
        "got {err:?}"
    );
}

#[test]
fn rejects_supervisor_with_unknown_manager() {
    let yaml = r"
stores: []
managers: []
supervisors:
  - id: s1
    name: Sup
    manager_id: z404
";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("unknown manager 'z404'")),
        "got {err:?}"
    );
}

#[test]
fn rejects_visit_for_unknown_store() {
    let yaml = r"
stores: []
managers:
  - id: z1
    name: Zonal
supervisors:
  - id: s1
    name: Sup
    manager_id: z1
visits:
  - supervisor_id: s1
    store_id: ghost
    days: [MONDAY]
";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("unknown store 'ghost'")),
        "got {err:?}"
    );
}

#[test]
fn rejects_sunday_visits() {
    let yaml = r"
stores:
  - id: a
    name: A
managers:
  - id: z1
    name: Zonal
supervisors:
  - id: s1
    name: Sup
    manager_id: z1
visits:
  - supervisor_id: s1
    store_id: a
    days: [SUNDAY]
";
    assert!(matches!(
        parse_catalog(yaml),
        Err(ConfigError::CatalogFileParse(_))
    ));
}

#[test]
fn rejects_blank_names() {
    let yaml = "stores:\n  - id: a\n    name: '  '\n";
    let err = parse_catalog(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("store name")));
}

#[test]
fn missing_file_reports_path() {
    let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::CatalogFileIo { ref path, .. } if path.contains("catalog.yaml")),
        "got {err:?}"
    );
}

#[test]
fn bundled_catalog_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
    let catalog = load_catalog(&path).expect("config/catalog.yaml should validate");
    assert!(!catalog.stores.is_empty());
    assert!(!catalog.supervisors.is_empty());
}
