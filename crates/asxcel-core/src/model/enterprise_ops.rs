//! Enterprise and route operations on the Model.

use log::{debug, info, warn};

use super::Model;
use crate::{
    db::Database,
    error::{ModelError, Result},
    models::{Airport, Enterprise, Route},
};

const SELECT_ENTERPRISE_ID_SQL: &str = "SELECT id FROM enterprises WHERE name = ?1 LIMIT 1";
const UNLINK_ENTERPRISE_SQL: &str = "DELETE FROM enterprise_has_airport WHERE enterprise = ?1";
const DELETE_ENTERPRISE_ROUTES_SQL: &str = "DELETE FROM routes WHERE enterprise = ?1";
const DELETE_ENTERPRISE_SQL: &str = "DELETE FROM enterprises WHERE id = ?1";

impl Model {
    /// Creates an enterprise founded at `main_hub` and activates it.
    ///
    /// The hub airport is created if needed. Inserting the enterprise and
    /// linking its hub happen in one transaction. If the name is already
    /// taken the existing enterprise is activated instead.
    pub fn create_enterprise(&mut self, name: &str, main_hub: &str) -> Result<&Enterprise> {
        let created = self.db.in_transaction(|db| {
            let hub = Airport::sync(db, main_hub)?;
            Enterprise::insert(db, name, &hub)
        });

        match created {
            Ok(id) => info!("Created enterprise '{name}' (id {id})"),
            Err(ModelError::ConstraintViolation { .. }) => {
                warn!("Enterprise '{name}' already exists, activating it");
            }
            Err(e) => return Err(e),
        }

        self.load_enterprise(name)
    }

    /// Activates the enterprise called `name`, loading its routes and the
    /// airports linked to it.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotFound` if no enterprise has this name. The
    /// previously active enterprise stays active in that case.
    pub fn load_enterprise(&mut self, name: &str) -> Result<&Enterprise> {
        let enterprise = Enterprise::load(&self.db, name)?;
        let airports = Airport::load_for_enterprise(&self.db, enterprise.id())?;

        info!("Activated enterprise '{name}'");
        self.airports = airports;
        Ok(self.enterprise.insert(enterprise))
    }

    /// Deletes an enterprise with its routes and airport links.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Rejected` for the active enterprise and
    /// `ModelError::NotFound` if no enterprise has this name.
    pub fn delete_enterprise(&mut self, name: &str) -> Result<()> {
        if self.enterprise.as_ref().is_some_and(|e| e.name() == name) {
            return Err(ModelError::rejected(format!(
                "enterprise '{name}' is active and cannot be deleted"
            )));
        }

        let mut result = self.db.query(SELECT_ENTERPRISE_ID_SQL, [name])?;
        let id = if result.next() { result.get_i64(0) } else { None };
        let id = id.ok_or_else(|| ModelError::NotFound {
            entity: "Enterprise",
            name: name.to_string(),
        })?;

        self.db.in_transaction(|db| {
            db.update(UNLINK_ENTERPRISE_SQL, [id])?;
            let routes = db.update(DELETE_ENTERPRISE_ROUTES_SQL, [id])?;
            db.update(DELETE_ENTERPRISE_SQL, [id])?;
            debug!("Deleted enterprise '{name}' and {routes} route(s)");
            Ok(())
        })
    }

    /// Names of every enterprise in the store, sorted.
    pub fn enterprise_names(&self) -> Result<Vec<String>> {
        Enterprise::names(&self.db)
    }

    /// Returns the active enterprise's route between two airports, creating
    /// it if needed. Both airports are linked to the enterprise.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NoActiveEnterprise` without an active enterprise,
    /// `ModelError::NotFound` if either airport does not exist and
    /// `ModelError::InvalidInput` if both names are the same airport.
    pub fn create_route(&mut self, origin: &str, destination: &str) -> Result<&Route> {
        self.active_enterprise()?;
        let origin = self.find_airport(origin)?;
        let destination = self.find_airport(destination)?;

        let enterprise = self
            .enterprise
            .as_mut()
            .ok_or(ModelError::NoActiveEnterprise)?;
        // The links are only kept if the route itself can be created.
        self.db.in_transaction(|db| {
            for airport in [&origin, &destination] {
                enterprise.link_airport(db, airport)?;
            }
            enterprise.create_route(db, &origin, &destination).map(|_| ())
        })?;

        let route = enterprise
            .route(origin.name(), destination.name())
            .ok_or_else(|| ModelError::NotFound {
                entity: "Route",
                name: format!("{} - {}", origin.name(), destination.name()),
            })?;
        for airport in [origin, destination] {
            super::insert_sorted(&mut self.airports, airport);
        }
        Ok(route)
    }

    /// Deletes one route of the active enterprise.
    pub fn delete_route(&mut self, origin: &str, destination: &str) -> Result<()> {
        let enterprise = self
            .enterprise
            .as_mut()
            .ok_or(ModelError::NoActiveEnterprise)?;
        enterprise.delete_route(&self.db, origin, destination)?;
        debug!("Deleted route '{origin} - {destination}'");
        Ok(())
    }

    /// Hands one route of the active enterprise to `f` for editing.
    pub fn with_route<T, F>(&mut self, origin: &str, destination: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Database, &mut Route) -> Result<T>,
    {
        let enterprise = self
            .enterprise
            .as_mut()
            .ok_or(ModelError::NoActiveEnterprise)?;
        let route =
            enterprise
                .route_mut(origin, destination)
                .ok_or_else(|| ModelError::NotFound {
                    entity: "Route",
                    name: format!("{origin} - {destination}"),
                })?;
        f(&self.db, route)
    }

    /// Airports a new route from `origin` could go to: every airport of the
    /// active enterprise except the origin itself, the main hub and the
    /// airports already served from `origin`.
    pub fn available_destinations(&self, origin: &str) -> Result<Vec<&Airport>> {
        let enterprise = self.active_enterprise()?;
        let origin = self.airport(origin).ok_or_else(|| ModelError::NotFound {
            entity: "Airport",
            name: origin.to_string(),
        })?;
        let served = enterprise.destinations(origin);

        Ok(self
            .airports
            .iter()
            .filter(|airport| *airport != origin)
            .filter(|airport| !enterprise.is_main_hub(airport))
            .filter(|airport| !served.contains(airport))
            .collect())
    }

    /// Looks an airport up in the loaded collection, then in the store.
    fn find_airport(&self, name: &str) -> Result<Airport> {
        if let Some(airport) = self.airport(name) {
            return Ok(airport.clone());
        }
        Airport::find(&self.db, name)?.ok_or_else(|| ModelError::NotFound {
            entity: "Airport",
            name: name.to_string(),
        })
    }
}
