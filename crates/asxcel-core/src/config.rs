//! Application settings persisted in the `meta_data` table.

use log::debug;
use serde::Serialize;

use crate::{db::Database, error::Result};

const HIGHLIGHT_SCHEDULED_ROUTES_KEY: &str = "highlightScheduledRoutes";

/// User settings that survive restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    highlight_scheduled_routes: bool,
}

impl Configuration {
    /// Reads every setting, falling back to the default for keys that were
    /// never written or hold something unreadable.
    pub fn load(db: &Database) -> Result<Self> {
        let highlight_scheduled_routes = db
            .read_meta(HIGHLIGHT_SCHEDULED_ROUTES_KEY)?
            .and_then(|value| parse_flag(&value))
            .unwrap_or(true);

        Ok(Self {
            highlight_scheduled_routes,
        })
    }

    /// Whether the routes table emphasises scheduled routes.
    pub fn highlight_scheduled_routes(&self) -> bool {
        self.highlight_scheduled_routes
    }

    pub fn set_highlight_scheduled_routes(&mut self, db: &Database, value: bool) -> Result<()> {
        db.write_meta(HIGHLIGHT_SCHEDULED_ROUTES_KEY, if value { "true" } else { "false" })?;
        debug!("Set {HIGHLIGHT_SCHEDULED_ROUTES_KEY} to {value}");
        self.highlight_scheduled_routes = value;
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            highlight_scheduled_routes: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::UpdateManager;

    fn create_test_store() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("asxcel.sqlite")).unwrap();
        UpdateManager::new(&db).install_updates().unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_defaults_when_unset() {
        let (_dir, db) = create_test_store();
        let config = Configuration::load(&db).unwrap();
        assert_eq!(config, Configuration::default());
        assert!(config.highlight_scheduled_routes());
    }

    #[test]
    fn test_setting_survives_reload() {
        let (_dir, db) = create_test_store();
        let mut config = Configuration::load(&db).unwrap();

        config.set_highlight_scheduled_routes(&db, false).unwrap();
        assert!(!Configuration::load(&db).unwrap().highlight_scheduled_routes());

        // Second write goes through the upsert path.
        config.set_highlight_scheduled_routes(&db, true).unwrap();
        assert!(Configuration::load(&db).unwrap().highlight_scheduled_routes());
        assert_eq!(
            db.read_meta(HIGHLIGHT_SCHEDULED_ROUTES_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_garbage_value_falls_back_to_default() {
        let (_dir, db) = create_test_store();
        db.write_meta(HIGHLIGHT_SCHEDULED_ROUTES_KEY, "maybe").unwrap();
        assert!(Configuration::load(&db).unwrap().highlight_scheduled_routes());
    }
}
