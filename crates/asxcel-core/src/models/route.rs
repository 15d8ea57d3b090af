//! Route entity.

use std::cmp::Ordering;

use rusqlite::ToSql;
use serde::Serialize;

use super::{airport::airport_columns, expect_updated, find_or_create, required_i64, Airport};
use crate::{
    db::{Database, QueryResult},
    error::{ModelError, Result},
};

const SELECT_ROUTE_SQL: &str = "SELECT id, distance, loadFrom, loadTo, scheduled FROM routes \
     WHERE enterprise = ?1 AND origin = ?2 AND destination = ?3 LIMIT 1";
const INSERT_ROUTE_SQL: &str =
    "INSERT INTO routes (enterprise, origin, destination) VALUES (?1, ?2, ?3)";
const DELETE_ROUTE_SQL: &str = "DELETE FROM routes WHERE id = ?1";

fn select_routes_sql() -> String {
    format!(
        "SELECT r.id AS id, r.distance AS distance, r.loadFrom AS loadFrom, \
         r.loadTo AS loadTo, r.scheduled AS scheduled, {}, {} FROM routes AS r \
         INNER JOIN airports AS o ON r.origin = o.id \
         LEFT JOIN countries AS oc ON o.country = oc.id \
         INNER JOIN airports AS d ON r.destination = d.id \
         LEFT JOIN countries AS dc ON d.country = dc.id \
         WHERE r.enterprise = ?1",
        airport_columns("o", "oc", "origin_"),
        airport_columns("d", "dc", "destination_"),
    )
}

/// A connection flown by one enterprise between two airports.
///
/// The origin and destination are snapshots of the airport rows taken when
/// the route was loaded; the Model refreshes them after airport edits.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    id: i64,
    enterprise_id: i64,
    origin: Airport,
    destination: Airport,
    distance: i64,
    load_to: i64,
    load_from: i64,
    scheduled: bool,
}

impl Route {
    /// Returns the enterprise's route from `origin` to `destination`,
    /// creating it if needed.
    pub fn sync(
        db: &Database,
        enterprise_id: i64,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<Self> {
        if origin.id() == destination.id() {
            return Err(ModelError::invalid_input("destination")
                .with_reason("origin and destination must not be the same"));
        }

        let key = format!("{} - {}", origin.name(), destination.name());
        let params = [enterprise_id, origin.id(), destination.id()];

        find_or_create(
            "Route",
            &key,
            || {
                let mut result = db.query(SELECT_ROUTE_SQL, params)?;
                if !result.next() {
                    return Ok(None);
                }
                Ok(Some(Self {
                    id: required_i64(&result, "id")?,
                    enterprise_id,
                    origin: origin.clone(),
                    destination: destination.clone(),
                    distance: result.get_i64_by_name("distance").unwrap_or(0),
                    load_to: result.get_i64_by_name("loadTo").unwrap_or(0),
                    load_from: result.get_i64_by_name("loadFrom").unwrap_or(0),
                    scheduled: result.get_bool_by_name("scheduled").unwrap_or(false),
                }))
            },
            || db.update(INSERT_ROUTE_SQL, params),
        )
    }

    /// Every route of an enterprise with both airports, in one query,
    /// sorted by origin name.
    pub fn load_for_enterprise(db: &Database, enterprise_id: i64) -> Result<Vec<Self>> {
        let mut result = db.query(&select_routes_sql(), [enterprise_id])?;
        let mut routes = Vec::with_capacity(result.row_count());
        while result.next() {
            routes.push(Self::from_result(&result, enterprise_id)?);
        }
        routes.sort();
        Ok(routes)
    }

    /// Builds a route from the current row of the enterprise routes query.
    pub fn from_result(result: &QueryResult, enterprise_id: i64) -> Result<Self> {
        Ok(Self {
            id: required_i64(result, "id")?,
            enterprise_id,
            origin: Airport::from_result_prefixed(result, "origin_")?,
            destination: Airport::from_result_prefixed(result, "destination_")?,
            distance: result.get_i64_by_name("distance").unwrap_or(0),
            load_to: result.get_i64_by_name("loadTo").unwrap_or(0),
            load_from: result.get_i64_by_name("loadFrom").unwrap_or(0),
            scheduled: result.get_bool_by_name("scheduled").unwrap_or(false),
        })
    }

    fn update_field(&self, db: &Database, column: &'static str, value: &dyn ToSql) -> Result<()> {
        let sql = format!("UPDATE routes SET {column} = ?1 WHERE id = ?2");
        let updated = db.update(&sql, rusqlite::params![value, self.id])?;
        expect_updated(updated, "Route", &self.to_key())
    }

    /// Removes the row.
    pub fn delete(&self, db: &Database) -> Result<()> {
        let deleted = db.update(DELETE_ROUTE_SQL, [self.id])?;
        expect_updated(deleted, "Route", &self.to_key())
    }

    pub fn set_distance(&mut self, db: &Database, distance: i64) -> Result<()> {
        check_non_negative("distance", distance)?;
        self.update_field(db, "distance", &distance)?;
        self.distance = distance;
        Ok(())
    }

    pub fn set_load_to(&mut self, db: &Database, load_to: i64) -> Result<()> {
        check_non_negative("loadTo", load_to)?;
        self.update_field(db, "loadTo", &load_to)?;
        self.load_to = load_to;
        Ok(())
    }

    pub fn set_load_from(&mut self, db: &Database, load_from: i64) -> Result<()> {
        check_non_negative("loadFrom", load_from)?;
        self.update_field(db, "loadFrom", &load_from)?;
        self.load_from = load_from;
        Ok(())
    }

    pub fn set_scheduled(&mut self, db: &Database, scheduled: bool) -> Result<()> {
        self.update_field(db, "scheduled", &scheduled)?;
        self.scheduled = scheduled;
        Ok(())
    }

    /// Replaces the origin or destination snapshot if it is `airport`.
    pub(crate) fn refresh_airport(&mut self, airport: &Airport) {
        if self.origin.id() == airport.id() {
            self.origin = airport.clone();
        }
        if self.destination.id() == airport.id() {
            self.destination = airport.clone();
        }
    }

    /// True if the route starts or ends at `airport`.
    pub fn touches(&self, airport: &Airport) -> bool {
        self.origin.id() == airport.id() || self.destination.id() == airport.id()
    }

    /// True if this is the route from `origin` to `destination` (by name).
    pub fn connects(&self, origin: &str, destination: &str) -> bool {
        self.origin.name() == origin && self.destination.name() == destination
    }

    fn to_key(&self) -> String {
        format!("{} - {}", self.origin.name(), self.destination.name())
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn enterprise_id(&self) -> i64 {
        self.enterprise_id
    }

    pub fn origin(&self) -> &Airport {
        &self.origin
    }

    pub fn destination(&self) -> &Airport {
        &self.destination
    }

    pub fn distance(&self) -> i64 {
        self.distance
    }

    pub fn load_to(&self) -> i64 {
        self.load_to
    }

    pub fn load_from(&self) -> i64 {
        self.load_from
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

fn check_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        Err(ModelError::invalid_input(field)
            .with_reason(format!("must not be negative, got {value}")))
    } else {
        Ok(())
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.destination == other.destination
    }
}

impl Eq for Route {}

impl PartialOrd for Route {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Route {
    fn cmp(&self, other: &Self) -> Ordering {
        self.origin
            .cmp(&other.origin)
            .then_with(|| self.destination.cmp(&other.destination))
    }
}
