//! Versioned schema upgrades.
//!
//! The schema version is stored under the `version` key of `meta_data`. Stores
//! written by the first release have no `meta_data` table at all and are
//! treated as version 1. Each upgrade step copies the store file to
//! `<store>.bak.<from>` and then runs inside a single transaction, so a failed
//! step leaves the store exactly as it was.

use std::{fs, path::PathBuf};

use log::{info, warn};

use super::Database;
use crate::error::{ModelError, Result};

/// Schema version this build of the application expects.
pub const CURRENT_VERSION: i64 = 2;

/// Version assumed when the store carries no version information.
pub const OLDEST_VERSION: i64 = 1;

const VERSION_KEY: &str = "version";

const BACKFILL_CROSS_JOIN_SQL: &str = "INSERT INTO enterprise_has_airport (enterprise, airport) \
     SELECT e.id, a.id FROM enterprises AS e CROSS JOIN airports AS a \
     WHERE NOT EXISTS (SELECT 1 FROM enterprise_has_airport AS j \
         WHERE j.enterprise = e.id AND j.airport = a.id)";

const BACKFILL_ROUTE_REFERENCED_SQL: &str = "INSERT INTO enterprise_has_airport (enterprise, airport) \
     SELECT DISTINCT u.enterprise, u.airport FROM ( \
         SELECT id AS enterprise, airport FROM enterprises WHERE airport IS NOT NULL \
         UNION SELECT enterprise, origin FROM routes \
         UNION SELECT enterprise, destination FROM routes \
     ) AS u \
     WHERE u.enterprise IN (SELECT id FROM enterprises) \
     AND u.airport IN (SELECT id FROM airports) \
     AND NOT EXISTS (SELECT 1 FROM enterprise_has_airport AS j \
         WHERE j.enterprise = u.enterprise AND j.airport = u.airport)";

/// How the version 2 upgrade fills `enterprise_has_airport` for data that
/// existed before the table did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackfillPolicy {
    /// Link every enterprise to every airport. Version 1 showed every airport
    /// to every enterprise, so this keeps existing stores looking the same.
    #[default]
    CrossJoin,
    /// Link an enterprise only to its main hub and the airports its routes
    /// use.
    RouteReferenced,
}

/// One upgrade step, taking the store from `version - 1` to `version`.
struct Migration {
    version: i64,
    description: &'static str,
    apply: fn(&Database, BackfillPolicy) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "metadata table and enterprise airport mapping",
    apply: migrate_to_2,
}];

fn migrate_to_2(db: &Database, backfill: BackfillPolicy) -> Result<()> {
    db.execute_batch(include_str!("../../assets/schema_v1.sql"))?;
    db.execute_batch(include_str!("../../assets/migrate_v2.sql"))?;

    let linked = match backfill {
        BackfillPolicy::CrossJoin => db.update(BACKFILL_CROSS_JOIN_SQL, [])?,
        BackfillPolicy::RouteReferenced => db.update(BACKFILL_ROUTE_REFERENCED_SQL, [])?,
    };
    info!("Linked {linked} airport(s) to enterprises ({backfill:?})");

    db.write_meta(VERSION_KEY, "2")
}

/// Detects the schema version of a store and upgrades it.
pub struct UpdateManager<'a> {
    database: &'a Database,
    backfill: BackfillPolicy,
}

impl<'a> UpdateManager<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self {
            database,
            backfill: BackfillPolicy::default(),
        }
    }

    pub fn with_backfill(mut self, backfill: BackfillPolicy) -> Self {
        self.backfill = backfill;
        self
    }

    /// Reads the stored schema version.
    ///
    /// A missing `meta_data` table or a missing `version` key both mean
    /// [`OLDEST_VERSION`].
    pub fn detect_version(&self) -> Result<i64> {
        if !self.database.table_exists("meta_data")? {
            return Ok(OLDEST_VERSION);
        }

        match self.database.read_meta(VERSION_KEY)? {
            Some(value) => parse_version(&value),
            None => Ok(OLDEST_VERSION),
        }
    }

    /// True if the store is older than [`CURRENT_VERSION`], or if its
    /// version cannot be determined.
    pub fn update_available(&self) -> bool {
        match self.detect_version() {
            Ok(version) => version < CURRENT_VERSION,
            Err(e) => {
                warn!("Cannot detect schema version, assuming an update is needed: {e}");
                true
            }
        }
    }

    /// Applies every pending step in order. Returns the number of steps that
    /// ran; zero for a store that is already current.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MigrationFailed` if a backup cannot be written or
    /// a step fails. The failing step is rolled back and no later step runs.
    pub fn install_updates(&self) -> Result<usize> {
        let detected = self.detect_version().unwrap_or(OLDEST_VERSION);
        let mut applied = 0;

        for migration in MIGRATIONS.iter().filter(|m| m.version > detected) {
            let from = migration.version - 1;
            info!(
                "Updating store from version {from} to {}: {}",
                migration.version, migration.description
            );

            let backup = self.backup(from).map_err(|e| ModelError::MigrationFailed {
                version: migration.version,
                reason: format!("backup failed: {e}"),
            })?;
            info!("Backed up store to {}", backup.display());

            self.database
                .in_transaction(|db| (migration.apply)(db, self.backfill))
                .map_err(|e| {
                    warn!("Rolled back update to version {}: {e}", migration.version);
                    ModelError::MigrationFailed {
                        version: migration.version,
                        reason: e.to_string(),
                    }
                })?;

            applied += 1;
        }

        if applied > 0 {
            info!("Store is now at version {CURRENT_VERSION}");
        }
        Ok(applied)
    }

    /// Path of the backup written before upgrading from `from`.
    pub fn backup_path(&self, from: i64) -> PathBuf {
        let mut path = self.database.path().as_os_str().to_owned();
        path.push(format!(".bak.{from}"));
        PathBuf::from(path)
    }

    fn backup(&self, from: i64) -> Result<PathBuf> {
        let target = self.backup_path(from);
        fs::copy(self.database.path(), &target).map_err(|source| ModelError::FileSystem {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }
}

/// Accepts plain integers as well as the `"1.0"` style written by early
/// releases.
fn parse_version(value: &str) -> Result<i64> {
    let value = value.trim();
    if let Ok(version) = value.parse::<i64>() {
        return Ok(version);
    }

    value
        .split('.')
        .next()
        .and_then(|major| major.parse::<i64>().ok())
        .ok_or_else(|| {
            ModelError::invalid_input(VERSION_KEY)
                .with_reason(format!("'{value}' is not a schema version"))
        })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn legacy_store(dir: &TempDir) -> Database {
        let db = Database::open(dir.path().join("asxcel.sqlite")).unwrap();
        db.execute_batch(include_str!("../../assets/schema_v1.sql")).unwrap();
        db.execute_batch(
            "INSERT INTO airports (name) VALUES ('Schiphol'), ('Tegel'), ('Heathrow');
             INSERT INTO enterprises (name, airport) VALUES ('Skyways', 1), ('Cloudhop', 2);
             INSERT INTO routes (origin, destination, enterprise) VALUES (1, 3, 1);",
        )
        .unwrap();
        db
    }

    fn link_count(db: &Database) -> i64 {
        let mut result = db
            .query("SELECT COUNT(*) FROM enterprise_has_airport", [])
            .unwrap();
        assert!(result.next());
        result.get_i64(0).unwrap()
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("2").unwrap(), 2);
        assert_eq!(parse_version(" 1.0 ").unwrap(), 1);
        assert!(parse_version("two").is_err());
    }

    #[test]
    fn test_fresh_store_is_upgraded() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("fresh.sqlite")).unwrap();
        let manager = UpdateManager::new(&db);

        assert_eq!(manager.detect_version().unwrap(), OLDEST_VERSION);
        assert!(manager.update_available());
        assert_eq!(manager.install_updates().unwrap(), 1);

        assert_eq!(db.read_meta("version").unwrap().as_deref(), Some("2"));
        assert!(db.table_exists("airports").unwrap());
        assert!(!manager.update_available());
    }

    #[test]
    fn test_cross_join_backfill() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);
        let manager = UpdateManager::new(&db);

        manager.install_updates().unwrap();

        // 2 enterprises x 3 airports
        assert_eq!(link_count(&db), 6);
        assert!(manager.backup_path(1).exists());
    }

    #[test]
    fn test_route_referenced_backfill() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);

        UpdateManager::new(&db)
            .with_backfill(BackfillPolicy::RouteReferenced)
            .install_updates()
            .unwrap();

        // Skyways: hub 1 plus route 1 -> 3; Cloudhop: hub 2
        assert_eq!(link_count(&db), 3);
        let mut result = db
            .query(
                "SELECT airport FROM enterprise_has_airport WHERE enterprise = 2",
                [],
            )
            .unwrap();
        assert!(result.next());
        assert_eq!(result.get_i64(0), Some(2));
        assert!(!result.next());
    }

    #[test]
    fn test_install_on_current_store_is_noop() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);
        let manager = UpdateManager::new(&db);
        manager.install_updates().unwrap();
        std::fs::remove_file(manager.backup_path(1)).unwrap();

        assert_eq!(manager.install_updates().unwrap(), 0);
        assert_eq!(link_count(&db), 6);
        assert!(!manager.backup_path(1).exists());
    }

    #[test]
    fn test_rerunning_step_does_not_duplicate_links() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);
        migrate_to_2(&db, BackfillPolicy::CrossJoin).unwrap();
        migrate_to_2(&db, BackfillPolicy::CrossJoin).unwrap();
        assert_eq!(link_count(&db), 6);
    }

    #[test]
    fn test_failed_backup_prevents_changes() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);
        let manager = UpdateManager::new(&db);

        // A directory where the backup file should go makes the copy fail.
        std::fs::create_dir(manager.backup_path(1)).unwrap();

        let err = manager.install_updates().unwrap_err();
        assert!(matches!(err, ModelError::MigrationFailed { version: 2, .. }));
        assert!(!db.table_exists("meta_data").unwrap());
        assert!(!db.table_exists("enterprise_has_airport").unwrap());
        assert!(manager.update_available());
    }

    #[test]
    fn test_failed_step_is_rolled_back() {
        let dir = TempDir::new().unwrap();
        let db = legacy_store(&dir);
        // An incompatible meta_data table makes the version upsert fail.
        db.execute_batch(
            "CREATE TABLE meta_data (id INTEGER PRIMARY KEY, key VARCHAR, value VARCHAR)",
        )
        .unwrap();
        let manager = UpdateManager::new(&db);

        let err = manager.install_updates().unwrap_err();
        assert!(matches!(err, ModelError::MigrationFailed { .. }));
        assert!(!db.table_exists("enterprise_has_airport").unwrap());
    }
}
