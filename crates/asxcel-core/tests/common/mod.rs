use std::path::{Path, PathBuf};

use asxcel_core::{Database, Model, ModelBuilder};
use tempfile::TempDir;

/// Tables and rows as the first release wrote them: no `meta_data`, no
/// `enterprise_has_airport`, and a route between two enterprises' airports.
const LEGACY_STORE_SQL: &str = "
    CREATE TABLE countries (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL UNIQUE);
    CREATE TABLE airports (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL UNIQUE,
        iata VARCHAR NOT NULL DEFAULT '', passengers INTEGER NOT NULL DEFAULT 0,
        cargo INTEGER NOT NULL DEFAULT 0, size VARCHAR NOT NULL DEFAULT '',
        transfer INTEGER NOT NULL DEFAULT 0, country INTEGER);
    CREATE TABLE enterprises (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL UNIQUE,
        airport INTEGER, country INTEGER);
    CREATE TABLE routes (id INTEGER PRIMARY KEY, origin INTEGER NOT NULL,
        destination INTEGER NOT NULL, enterprise INTEGER NOT NULL,
        distance INTEGER NOT NULL DEFAULT 0, loadFrom INTEGER NOT NULL DEFAULT 0,
        loadTo INTEGER NOT NULL DEFAULT 0, scheduled INTEGER NOT NULL DEFAULT 0);

    INSERT INTO countries (name) VALUES ('Netherlands');
    INSERT INTO airports (name, iata, passengers, cargo, country)
        VALUES ('Schiphol', 'AMS', 9, 7, 1);
    INSERT INTO airports (name, iata, passengers, cargo) VALUES ('Heathrow', 'LHR', 10, 8);
    INSERT INTO airports (name, iata) VALUES ('Tegel', 'TXL');
    INSERT INTO enterprises (name, airport) VALUES ('Skyways', 1);
    INSERT INTO enterprises (name, airport) VALUES ('Blue Air', 3);
    INSERT INTO routes (origin, destination, enterprise, distance, scheduled)
        VALUES (1, 2, 1, 371, 1);
";

/// Version 2 tables as early releases created them: the link table has no
/// unique key, and Skyways already carries a repeated link to its hub.
const EARLY_V2_SQL: &str = "
    CREATE TABLE meta_data (id INTEGER PRIMARY KEY, key VARCHAR NOT NULL UNIQUE,
        value VARCHAR NOT NULL);
    INSERT INTO meta_data (key, value) VALUES ('version', '2');
    CREATE TABLE enterprise_has_airport (id INTEGER PRIMARY KEY,
        enterprise INTEGER NOT NULL, airport INTEGER NOT NULL,
        FOREIGN KEY (enterprise) REFERENCES enterprises (id),
        FOREIGN KEY (airport) REFERENCES airports (id));
    INSERT INTO enterprise_has_airport (enterprise, airport) VALUES (1, 1), (1, 2), (1, 1);
";

/// Helper function to create a test model on an empty store
pub fn create_test_model() -> (TempDir, Model) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("asxcel.sqlite");
    let model = ModelBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .expect("Failed to create model");
    (temp_dir, model)
}

/// Writes a store in the version 1 format into `dir` and returns its path.
pub fn create_legacy_store(dir: &Path) -> PathBuf {
    let path = dir.join("legacy.sqlite");
    let db = Database::open(&path).expect("Failed to open legacy store");
    db.execute_batch(LEGACY_STORE_SQL)
        .expect("Failed to write legacy store");
    db.close().expect("Failed to close legacy store");
    path
}

/// Single integer produced by `sql`.
pub fn scalar(db: &Database, sql: &str) -> i64 {
    let mut result = db.query(sql, []).expect("Failed to run query");
    assert!(result.next(), "query returned no row: {sql}");
    result.get_i64(0).expect("Not an integer")
}

/// Writes a version 2 store whose link table lacks a unique key.
pub fn create_early_v2_store(dir: &Path) -> PathBuf {
    let path = create_legacy_store(dir);
    let db = Database::open(&path).expect("Failed to open legacy store");
    db.execute_batch(EARLY_V2_SQL)
        .expect("Failed to write version 2 tables");
    db.close().expect("Failed to close legacy store");
    path
}
