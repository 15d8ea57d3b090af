//! Builder for creating and configuring Model instances.

use std::path::{Path, PathBuf};

use log::info;

use super::Model;
use crate::{
    db::{BackfillPolicy, Database, UpdateManager},
    error::{ModelError, Result},
};

/// Builder for creating and configuring Model instances.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    database_path: Option<PathBuf>,
    backfill: BackfillPolicy,
}

impl ModelBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            backfill: BackfillPolicy::default(),
        }
    }

    /// Sets a custom store file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/asxcel/asxcel.sqlite` or
    /// `~/.local/share/asxcel/asxcel.sqlite`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// How `enterprise_has_airport` is filled when a version 1 store is
    /// upgraded.
    pub fn with_backfill(mut self, backfill: BackfillPolicy) -> Self {
        self.backfill = backfill;
        self
    }

    /// Opens the store, installs pending schema updates and returns a
    /// connected Model.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::FileSystem` if the store directory cannot be
    /// created, `ModelError::StoreUnavailable` if the file cannot be opened
    /// and `ModelError::MigrationFailed` if an update cannot be applied.
    pub fn build(self) -> Result<Model> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db = Database::open(&db_path)?;
        let updates = UpdateManager::new(&db).with_backfill(self.backfill);
        if updates.update_available() {
            let applied = updates.install_updates()?;
            info!("Installed {applied} schema update(s) on {}", db_path.display());
        }

        Model::new(db)
    }

    /// Returns the default store path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("asxcel")
            .place_data_file("asxcel.sqlite")
            .map_err(|e| ModelError::XdgDirectory(e.to_string()))
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
