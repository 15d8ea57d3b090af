//! Enterprise entity and its routes.

use log::{debug, info};
use serde::Serialize;

use super::{
    airport::airport_columns, expect_updated, required_i64, required_text, validate_name, Airport,
    Country, Route,
};
use crate::{
    db::Database,
    error::{ModelError, ModelResultExt, Result},
};

const INSERT_ENTERPRISE_SQL: &str = "INSERT INTO enterprises (name, airport) VALUES (?1, ?2)";
// Stores upgraded by early releases lack a unique key on the pair.
const LINK_AIRPORT_SQL: &str = "INSERT INTO enterprise_has_airport (enterprise, airport) \
     SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM enterprise_has_airport \
         WHERE enterprise = ?1 AND airport = ?2)";
const SELECT_NAMES_SQL: &str = "SELECT name FROM enterprises ORDER BY name";

fn select_enterprise_sql() -> String {
    format!(
        "SELECT e.id AS id, e.name AS name, c.id AS country_id, c.name AS country_name, {} \
         FROM enterprises AS e \
         LEFT JOIN countries AS c ON e.country = c.id \
         LEFT JOIN airports AS h ON e.airport = h.id \
         LEFT JOIN countries AS hc ON h.country = hc.id \
         WHERE e.name = ?1 LIMIT 1",
        airport_columns("h", "hc", "hub_"),
    )
}

/// An airline run by the player, with its main hub and routes.
#[derive(Debug, Clone, Serialize)]
pub struct Enterprise {
    id: i64,
    name: String,
    country: Option<Country>,
    main_hub: Option<Airport>,
    routes: Vec<Route>,
}

impl Enterprise {
    /// Loads an existing enterprise and all of its routes.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotFound` if no enterprise has this name.
    pub fn load(db: &Database, name: &str) -> Result<Self> {
        let mut result = db.query(&select_enterprise_sql(), [name])?;
        if !result.next() {
            return Err(ModelError::NotFound {
                entity: "Enterprise",
                name: name.to_string(),
            });
        }

        let id = required_i64(&result, "id")?;
        // Legacy stores may carry enterprises without a hub.
        let main_hub = match result.get_i64_by_name("hub_id") {
            Some(_) => Some(Airport::from_result_prefixed(&result, "hub_")?),
            None => None,
        };

        let mut enterprise = Self {
            id,
            name: required_text(&result, "name")?,
            country: Country::from_joined(&result, ""),
            main_hub,
            routes: Vec::new(),
        };
        enterprise.load_routes(db)?;

        info!(
            "Loaded enterprise '{}' with {} route(s)",
            enterprise.name,
            enterprise.routes.len()
        );
        Ok(enterprise)
    }

    /// Inserts a new enterprise row with `main_hub` as its hub and links the
    /// hub to it. Callers wrap this in a transaction.
    pub(crate) fn insert(db: &Database, name: &str, main_hub: &Airport) -> Result<i64> {
        validate_name("enterprise", name)?;

        db.update(INSERT_ENTERPRISE_SQL, rusqlite::params![name, main_hub.id()])
            .on_conflict("Enterprise", name)?;
        let id = db.last_insert_id();
        link_airport(db, id, main_hub)?;

        debug!("Inserted enterprise '{name}' with hub '{}'", main_hub.name());
        Ok(id)
    }

    /// Names of every enterprise in the store, sorted.
    pub fn names(db: &Database) -> Result<Vec<String>> {
        let mut result = db.query(SELECT_NAMES_SQL, [])?;
        let mut names = Vec::with_capacity(result.row_count());
        while result.next() {
            if let Some(name) = result.get(0) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Returns the route from `origin` to `destination`, creating and
    /// persisting it if the enterprise does not fly it yet.
    pub fn create_route(
        &mut self,
        db: &Database,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<&Route> {
        if let Some(index) = self.route_index(origin.name(), destination.name()) {
            return Ok(&self.routes[index]);
        }

        let route = Route::sync(db, self.id, origin, destination)?;
        let index = match self.routes.binary_search(&route) {
            Ok(index) | Err(index) => index,
        };
        self.routes.insert(index, route);
        Ok(&self.routes[index])
    }

    /// Replaces the in-memory routes with a fresh read from the store.
    pub fn load_routes(&mut self, db: &Database) -> Result<()> {
        self.routes = Route::load_for_enterprise(db, self.id)?;
        Ok(())
    }

    /// Deletes the route from `origin` to `destination`.
    pub fn delete_route(&mut self, db: &Database, origin: &str, destination: &str) -> Result<()> {
        let index = self
            .route_index(origin, destination)
            .ok_or_else(|| ModelError::NotFound {
                entity: "Route",
                name: format!("{origin} - {destination}"),
            })?;

        self.routes[index].delete(db)?;
        self.routes.remove(index);
        Ok(())
    }

    /// Makes `airport` visible to this enterprise.
    pub fn link_airport(&self, db: &Database, airport: &Airport) -> Result<()> {
        link_airport(db, self.id, airport)
    }

    pub fn set_country(&mut self, db: &Database, country: Option<&Country>) -> Result<()> {
        let updated = db.update(
            "UPDATE enterprises SET country = ?1 WHERE id = ?2",
            rusqlite::params![country.map(Country::id), self.id],
        )?;
        expect_updated(updated, "Enterprise", &self.name)?;
        self.country = country.cloned();
        Ok(())
    }

    /// The airport this enterprise was founded at.
    pub fn main_hub(&self) -> Option<&Airport> {
        self.main_hub.as_ref()
    }

    pub fn is_main_hub(&self, airport: &Airport) -> bool {
        self.main_hub
            .as_ref()
            .is_some_and(|hub| hub.id() == airport.id())
    }

    /// True if any loaded route starts or ends at `airport`.
    pub fn routes_exist_for(&self, airport: &Airport) -> bool {
        self.routes.iter().any(|route| route.touches(airport))
    }

    /// Airports already served from `origin`.
    pub fn destinations(&self, origin: &Airport) -> Vec<&Airport> {
        self.routes
            .iter()
            .filter(|route| route.origin().id() == origin.id())
            .map(Route::destination)
            .collect()
    }

    pub fn route(&self, origin: &str, destination: &str) -> Option<&Route> {
        self.route_index(origin, destination)
            .map(|index| &self.routes[index])
    }

    pub(crate) fn route_mut(&mut self, origin: &str, destination: &str) -> Option<&mut Route> {
        self.routes
            .iter_mut()
            .find(|route| route.connects(origin, destination))
    }

    fn route_index(&self, origin: &str, destination: &str) -> Option<usize> {
        self.routes
            .iter()
            .position(|route| route.connects(origin, destination))
    }

    /// Propagates an edited airport into the hub and route snapshots.
    pub(crate) fn refresh_airport(&mut self, airport: &Airport) {
        if let Some(hub) = self.main_hub.as_mut() {
            if hub.id() == airport.id() {
                *hub = airport.clone();
            }
        }
        let mut touched = false;
        for route in &mut self.routes {
            if route.touches(airport) {
                route.refresh_airport(airport);
                touched = true;
            }
        }
        // A rename can change the origin order.
        if touched {
            self.routes.sort();
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    /// Routes sorted by origin name.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

fn link_airport(db: &Database, enterprise_id: i64, airport: &Airport) -> Result<()> {
    db.update(LINK_AIRPORT_SQL, [enterprise_id, airport.id()])
        .map(|_| ())
}

impl PartialEq for Enterprise {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Enterprise {}
