//! Core library for ASxcel, a route planner for AirlineSim enterprises.
//!
//! The crate keeps airports, countries, enterprises and their routes in a
//! local SQLite store and exposes them through one aggregate root, the
//! [`Model`]. Layers, from the bottom up:
//!
//! - [`db`]: the single store connection ([`Database`]), detached query
//!   results ([`QueryResult`]) and schema upgrades ([`UpdateManager`])
//! - [`models`]: the entities, each mirroring one row and persisting its
//!   setters immediately
//! - [`model`]: the [`Model`] and its [`ModelBuilder`]
//! - [`config`]: settings stored next to the schema version
//! - [`display`]: markdown formatting for terminal front ends
//!
//! # Quick Start
//!
//! ```rust
//! use asxcel_core::{display::RoutesTable, ModelBuilder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let mut model = ModelBuilder::new()
//!     .with_database_path(Some(dir.path().join("asxcel.sqlite")))
//!     .build()?;
//!
//! // Creating an enterprise also activates it.
//! model.create_enterprise("Skyways", "Schiphol")?;
//! model.create_airport("Heathrow")?;
//! model.create_route("Schiphol", "Heathrow")?;
//!
//! if let Some(enterprise) = model.enterprise() {
//!     println!("{}", RoutesTable::new(enterprise.routes()));
//! }
//! model.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod model;
pub mod models;

// Re-export commonly used types
pub use config::Configuration;
pub use db::{BackfillPolicy, Database, QueryResult, UpdateManager, CURRENT_VERSION};
pub use display::{Airports, Countries, CreateResult, OperationStatus, RoutesTable, UpdateResult};
pub use error::{ModelError, Result};
pub use model::{Model, ModelBuilder, ModelState};
pub use models::{Airport, Country, Enterprise, Route, MAX_DEMAND};
