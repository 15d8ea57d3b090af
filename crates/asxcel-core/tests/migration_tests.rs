mod common;

use asxcel_core::{
    BackfillPolicy, Database, ModelBuilder, ModelError, ModelState, UpdateManager, CURRENT_VERSION,
};
use common::{create_early_v2_store, create_legacy_store, scalar};
use tempfile::TempDir;

#[test]
fn test_legacy_store_is_upgraded_with_cross_join() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_legacy_store(temp_dir.path());

    let db = Database::open(&path).unwrap();
    let updates = UpdateManager::new(&db);
    assert_eq!(updates.detect_version().unwrap(), 1);
    assert!(updates.update_available());

    assert_eq!(updates.install_updates().unwrap(), 1);
    assert_eq!(updates.detect_version().unwrap(), CURRENT_VERSION);
    assert!(!updates.update_available());
    assert_eq!(db.read_meta("version").unwrap().as_deref(), Some("2"));

    // 2 enterprises x 3 airports
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM enterprise_has_airport"), 6);
    assert!(updates.backup_path(1).exists());

    // Existing rows are untouched.
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM routes"), 1);
    assert_eq!(scalar(&db, "SELECT passengers FROM airports WHERE name = 'Schiphol'"), 9);
}

#[test]
fn test_second_install_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_legacy_store(temp_dir.path());
    let db = Database::open(&path).unwrap();
    let updates = UpdateManager::new(&db);
    updates.install_updates().unwrap();

    // A second backup would overwrite the first; remove it to see whether
    // one is taken.
    std::fs::remove_file(updates.backup_path(1)).unwrap();

    assert_eq!(updates.install_updates().unwrap(), 0);
    assert!(!updates.backup_path(1).exists());
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM enterprise_has_airport"), 6);
}

#[test]
fn test_builder_upgrades_legacy_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_legacy_store(temp_dir.path());

    let mut model = ModelBuilder::new()
        .with_database_path(Some(&path))
        .with_backfill(BackfillPolicy::RouteReferenced)
        .build()
        .unwrap();
    assert_eq!(model.state(), ModelState::Connected);
    assert_eq!(model.airports().len(), 3);
    assert_eq!(model.countries().len(), 1);

    let enterprise = model.load_enterprise("Skyways").unwrap();
    assert_eq!(enterprise.routes().len(), 1);
    let route = &enterprise.routes()[0];
    assert_eq!(route.origin().name(), "Schiphol");
    assert_eq!(route.origin().country().map(|c| c.name()), Some("Netherlands"));
    assert_eq!(route.destination().iata_code(), "LHR");
    assert_eq!(route.distance(), 371);
    assert!(route.is_scheduled());

    // Only the hub and the route's airports were linked.
    let names = model
        .airports()
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Heathrow", "Schiphol"]);

    model.load_enterprise("Blue Air").unwrap();
    assert_eq!(model.airports().len(), 1);
}

#[test]
fn test_blocked_backup_aborts_build() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_legacy_store(temp_dir.path());

    let db = Database::open(&path).unwrap();
    let backup = UpdateManager::new(&db).backup_path(1);
    db.close().unwrap();
    std::fs::create_dir(&backup).unwrap();

    let err = ModelBuilder::new()
        .with_database_path(Some(&path))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ModelError::MigrationFailed { version: 2, .. }));

    let db = Database::open(&path).unwrap();
    assert!(!db.table_exists("meta_data").unwrap());
    assert!(!db.table_exists("enterprise_has_airport").unwrap());
}

#[test]
fn test_links_without_unique_key_do_not_repeat_airports() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_early_v2_store(temp_dir.path());

    let mut model = ModelBuilder::new()
        .with_database_path(Some(&path))
        .build()
        .unwrap();
    assert!(!UpdateManager::new(model.database()).update_available());
    let links_before = scalar(model.database(), "SELECT COUNT(*) FROM enterprise_has_airport");

    model.load_enterprise("Skyways").unwrap();
    model.create_airport("Heathrow").unwrap();
    model.create_route("Schiphol", "Heathrow").unwrap();
    model.load_airports().unwrap();

    let names = model.airports().iter().map(|a| a.name()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Heathrow", "Schiphol"]);
    assert_eq!(
        scalar(model.database(), "SELECT COUNT(*) FROM enterprise_has_airport"),
        links_before
    );

    model.create_airport("Tegel").unwrap();
    model.load_airports().unwrap();
    assert_eq!(model.airports().len(), 3);
    assert_eq!(
        scalar(model.database(), "SELECT COUNT(*) FROM enterprise_has_airport"),
        links_before + 1
    );
}
