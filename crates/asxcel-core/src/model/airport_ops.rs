//! Airport and country operations on the Model.

use log::{debug, info};

use super::{insert_sorted, Model};
use crate::{
    db::Database,
    error::{ModelError, Result},
    models::{Airport, Country},
};

const HUB_COUNT_SQL: &str = "SELECT COUNT(*) FROM enterprises WHERE airport = ?1";
const ROUTE_COUNT_SQL: &str =
    "SELECT COUNT(*) FROM routes WHERE origin = ?1 OR destination = ?1";
const UNLINK_AIRPORT_SQL: &str = "DELETE FROM enterprise_has_airport WHERE airport = ?1";
const DELETE_AIRPORT_SQL: &str = "DELETE FROM airports WHERE id = ?1";

impl Model {
    /// Returns the airport called `name`, creating it if needed.
    ///
    /// With an active enterprise the airport is also linked to it, so it
    /// shows up in that enterprise's airport list.
    pub fn create_airport(&mut self, name: &str) -> Result<&Airport> {
        let airport = Airport::sync(&self.db, name)?;
        if let Some(enterprise) = &self.enterprise {
            enterprise.link_airport(&self.db, &airport)?;
        }

        let index = insert_sorted(&mut self.airports, airport);
        Ok(&self.airports[index])
    }

    /// Returns the country called `name`, creating it if needed.
    pub fn create_country(&mut self, name: &str) -> Result<&Country> {
        let country = Country::sync(&self.db, name)?;
        let index = insert_sorted(&mut self.countries, country);
        Ok(&self.countries[index])
    }

    /// Deletes an airport together with its enterprise links.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotFound` if no airport has this name, and
    /// `ModelError::Rejected` if the airport is the main hub of any
    /// enterprise or an endpoint of any route. Both checks run against the
    /// store, not just the active enterprise.
    pub fn delete_airport(&mut self, name: &str) -> Result<()> {
        let airport = Airport::find(&self.db, name)?.ok_or_else(|| ModelError::NotFound {
            entity: "Airport",
            name: name.to_string(),
        })?;

        if count(&self.db, HUB_COUNT_SQL, airport.id())? > 0 {
            return Err(ModelError::rejected(format!(
                "airport '{name}' is the main hub of an enterprise"
            )));
        }
        let routes = count(&self.db, ROUTE_COUNT_SQL, airport.id())?;
        if routes > 0 {
            return Err(ModelError::rejected(format!(
                "airport '{name}' is used by {routes} route(s)"
            )));
        }

        self.db.in_transaction(|db| {
            db.update(UNLINK_AIRPORT_SQL, [airport.id()])?;
            db.update(DELETE_AIRPORT_SQL, [airport.id()])
        })?;
        debug!("Deleted airport '{name}'");

        self.airports.retain(|a| a.id() != airport.id());
        Ok(())
    }

    /// Reloads the airport collection from the store.
    pub fn load_airports(&mut self) -> Result<()> {
        self.airports = match &self.enterprise {
            Some(enterprise) => Airport::load_for_enterprise(&self.db, enterprise.id())?,
            None => Airport::load_all(&self.db)?,
        };
        info!("Loaded {} airport(s)", self.airports.len());
        Ok(())
    }

    /// Reloads the country collection from the store.
    pub fn load_countries(&mut self) -> Result<()> {
        self.countries = Country::load_all(&self.db)?;
        Ok(())
    }

    /// Hands the airport called `name` to `f` for editing.
    ///
    /// Whatever `f` returns, the airport collection is re-sorted afterwards
    /// and the active enterprise's copies of the airport are refreshed.
    ///
    /// ```rust
    /// # use asxcel_core::ModelBuilder;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let dir = tempfile::TempDir::new()?;
    /// # let mut model = ModelBuilder::new()
    /// #     .with_database_path(Some(dir.path().join("asxcel.sqlite")))
    /// #     .build()?;
    /// model.create_airport("Schiphol")?;
    /// model.with_airport("Schiphol", |db, airport| {
    ///     airport.set_iata_code(db, "AMS")?;
    ///     airport.set_passengers(db, 9)
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_airport<T, F>(&mut self, name: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Database, &mut Airport) -> Result<T>,
    {
        let index = self
            .airports
            .iter()
            .position(|airport| airport.name() == name)
            .ok_or_else(|| ModelError::NotFound {
                entity: "Airport",
                name: name.to_string(),
            })?;

        let outcome = f(&self.db, &mut self.airports[index]);

        let edited = self.airports[index].clone();
        self.airports.sort();
        if let Some(enterprise) = self.enterprise.as_mut() {
            enterprise.refresh_airport(&edited);
        }
        outcome
    }
}

fn count(db: &Database, sql: &str, id: i64) -> Result<i64> {
    let mut result = db.query(sql, [id])?;
    Ok(if result.next() {
        result.get_i64(0).unwrap_or(0)
    } else {
        0
    })
}
