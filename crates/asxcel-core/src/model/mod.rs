//! The Model: single entry point for front ends.
//!
//! A [`Model`] owns the one [`Database`] connection of the process, the
//! sorted airport and country collections, and at most one active
//! [`Enterprise`]. Front ends never talk to the gateway directly; every
//! read and write goes through the operations defined here and in the
//! submodules:
//!
//! - [`builder`]: [`ModelBuilder`], which locates the store, upgrades it and
//!   returns a connected Model
//! - `airport_ops`: airports and countries
//! - `enterprise_ops`: enterprises and their routes
//!
//! # Lifecycle
//!
//! ```text
//! ModelBuilder::build ──▶ Connected ──load_enterprise / create_enterprise──▶ EnterpriseActive
//! ```
//!
//! Only `load_enterprise` and `create_enterprise` assign the active
//! enterprise. There is no way back to `Connected`; switching enterprises
//! goes straight from one active enterprise to the next.
//!
//! # Example
//!
//! ```rust
//! use asxcel_core::ModelBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let mut model = ModelBuilder::new()
//!     .with_database_path(Some(dir.path().join("asxcel.sqlite")))
//!     .build()?;
//!
//! model.create_enterprise("Skyways", "Schiphol")?;
//! model.create_airport("Heathrow")?;
//! model.create_route("Schiphol", "Heathrow")?;
//! model.with_route("Schiphol", "Heathrow", |db, route| route.set_distance(db, 371))?;
//!
//! assert_eq!(model.enterprise().map(|e| e.routes().len()), Some(1));
//! model.close()?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::{
    config::Configuration,
    db::Database,
    error::{ModelError, Result},
    models::{Airport, Country, Enterprise},
};

mod airport_ops;
pub mod builder;
mod enterprise_ops;


pub use builder::ModelBuilder;

/// Where a Model is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelState {
    /// Store open and countries loaded; no enterprise chosen yet.
    Connected,
    /// An enterprise was loaded or created and scopes airports and routes.
    EnterpriseActive,
}

/// Aggregate root over the store.
pub struct Model {
    db: Database,
    configuration: Configuration,
    airports: Vec<Airport>,
    countries: Vec<Country>,
    enterprise: Option<Enterprise>,
}

impl Model {
    /// Wraps an already upgraded store and loads the global collections.
    pub(crate) fn new(db: Database) -> Result<Self> {
        let configuration = Configuration::load(&db)?;
        let mut model = Self {
            db,
            configuration,
            airports: Vec::new(),
            countries: Vec::new(),
            enterprise: None,
        };
        model.load_countries()?;
        model.load_airports()?;
        Ok(model)
    }

    pub fn state(&self) -> ModelState {
        if self.enterprise.is_some() {
            ModelState::EnterpriseActive
        } else {
            ModelState::Connected
        }
    }

    /// The gateway, for callers that need to run entity setters directly.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn set_highlight_scheduled_routes(&mut self, value: bool) -> Result<()> {
        self.configuration
            .set_highlight_scheduled_routes(&self.db, value)
    }

    /// Airports visible right now, sorted by name. With an active enterprise
    /// these are the airports linked to it; otherwise every airport.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn airport(&self, name: &str) -> Option<&Airport> {
        self.airports.iter().find(|airport| airport.name() == name)
    }

    /// Countries sorted by name.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, name: &str) -> Option<&Country> {
        self.countries.iter().find(|country| country.name() == name)
    }

    /// The active enterprise, if any.
    pub fn enterprise(&self) -> Option<&Enterprise> {
        self.enterprise.as_ref()
    }

    fn active_enterprise(&self) -> Result<&Enterprise> {
        self.enterprise.as_ref().ok_or(ModelError::NoActiveEnterprise)
    }

    /// Shuts the store down. Consumes the Model so this happens once.
    pub fn close(self) -> Result<()> {
        self.db.close()
    }
}

/// Inserts `item` at its sorted position unless an equal item is present.
/// Returns the index of the item in `items`.
fn insert_sorted<T: Ord>(items: &mut Vec<T>, item: T) -> usize {
    match items.binary_search(&item) {
        Ok(index) => index,
        Err(index) => {
            items.insert(index, item);
            index
        }
    }
}
