//! Airport entity.

use std::cmp::Ordering;

use rusqlite::ToSql;
use serde::Serialize;

use super::{
    expect_updated, find_or_create, required_i64, required_text, validate_name, Country,
    MAX_DEMAND,
};
use crate::{
    db::{Database, QueryResult},
    error::{ModelError, ModelResultExt, Result},
};

const INSERT_AIRPORT_SQL: &str = "INSERT INTO airports (name) VALUES (?1)";

/// Select list for an airport joined with its country, every column name
/// prefixed with `prefix`. `airport` and `country` are the table aliases used
/// in the surrounding query.
pub(crate) fn airport_columns(airport: &str, country: &str, prefix: &str) -> String {
    format!(
        "{airport}.id AS {prefix}id, {airport}.name AS {prefix}name, \
         {airport}.iata AS {prefix}iata, {airport}.passengers AS {prefix}passengers, \
         {airport}.cargo AS {prefix}cargo, {airport}.size AS {prefix}size, \
         {airport}.transfer AS {prefix}transfer, {country}.id AS {prefix}country_id, \
         {country}.name AS {prefix}country_name"
    )
}

fn select_airport_sql(filter: &str) -> String {
    format!(
        "SELECT {} FROM airports AS a LEFT JOIN countries AS c ON a.country = c.id {filter}",
        airport_columns("a", "c", "")
    )
}

/// An airport of the game world.
///
/// Airport rows are global; which enterprise gets to see an airport is
/// decided by `enterprise_has_airport`.
#[derive(Debug, Clone, Serialize)]
pub struct Airport {
    id: i64,
    name: String,
    iata_code: String,
    size: String,
    passengers: u8,
    cargo: u8,
    transfer_possible: bool,
    country: Option<Country>,
}

impl Airport {
    /// Returns the airport called `name`, creating it with default values if
    /// needed.
    pub fn sync(db: &Database, name: &str) -> Result<Self> {
        validate_name("airport", name)?;

        find_or_create(
            "Airport",
            name,
            || Self::find(db, name),
            || db.update(INSERT_AIRPORT_SQL, [name]),
        )
    }

    /// Looks an airport up without creating it.
    pub fn find(db: &Database, name: &str) -> Result<Option<Self>> {
        let mut result = db.query(&select_airport_sql("WHERE a.name = ?1 LIMIT 1"), [name])?;
        if result.next() {
            Self::from_result(&result).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Airports linked to an enterprise, sorted by name.
    pub fn load_for_enterprise(db: &Database, enterprise_id: i64) -> Result<Vec<Self>> {
        let sql = select_airport_sql(
            "WHERE a.id IN (SELECT airport FROM enterprise_has_airport WHERE enterprise = ?1)",
        );
        Self::load_with(db, &sql, [enterprise_id])
    }

    /// Every airport in the store, sorted by name.
    pub fn load_all(db: &Database) -> Result<Vec<Self>> {
        Self::load_with(db, &select_airport_sql(""), [])
    }

    fn load_with<P: rusqlite::Params>(db: &Database, sql: &str, params: P) -> Result<Vec<Self>> {
        let mut result = db.query(sql, params)?;
        let mut airports = Vec::with_capacity(result.row_count());
        while result.next() {
            airports.push(Self::from_result(&result)?);
        }
        airports.sort();
        Ok(airports)
    }

    /// Builds an airport from the current row of a result produced by
    /// [`airport_columns`] with an empty prefix.
    pub fn from_result(result: &QueryResult) -> Result<Self> {
        Self::from_result_prefixed(result, "")
    }

    pub(crate) fn from_result_prefixed(result: &QueryResult, prefix: &str) -> Result<Self> {
        let column = |name: &str| format!("{prefix}{name}");
        let demand = |name: &str| {
            result
                .get_i64_by_name(&column(name))
                .unwrap_or(0)
                .clamp(0, i64::from(MAX_DEMAND)) as u8
        };

        Ok(Self {
            id: required_i64(result, &column("id"))?,
            name: required_text(result, &column("name"))?,
            iata_code: result.get_by_name(&column("iata")).unwrap_or_default().to_string(),
            size: result.get_by_name(&column("size")).unwrap_or_default().to_string(),
            passengers: demand("passengers"),
            cargo: demand("cargo"),
            transfer_possible: result.get_bool_by_name(&column("transfer")).unwrap_or(false),
            country: Country::from_joined(result, prefix),
        })
    }

    /// Persists one column, keyed by id.
    fn update_field(&self, db: &Database, column: &'static str, value: &dyn ToSql) -> Result<()> {
        let sql = format!("UPDATE airports SET {column} = ?1 WHERE id = ?2");
        let updated = db
            .update(&sql, rusqlite::params![value, self.id])
            .on_conflict("Airport", &self.name)?;
        expect_updated(updated, "Airport", &self.name)
    }

    /// Renames the airport. Fails with `ConstraintViolation` if the name is
    /// taken.
    pub fn set_name(&mut self, db: &Database, name: &str) -> Result<()> {
        validate_name("airport", name)?;
        self.update_field(db, "name", &name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_iata_code(&mut self, db: &Database, iata_code: &str) -> Result<()> {
        let iata_code = iata_code.trim().to_uppercase();
        self.update_field(db, "iata", &iata_code)?;
        self.iata_code = iata_code;
        Ok(())
    }

    pub fn set_size(&mut self, db: &Database, size: &str) -> Result<()> {
        self.update_field(db, "size", &size)?;
        self.size = size.to_string();
        Ok(())
    }

    /// Sets passenger demand on the 0-10 scale.
    pub fn set_passengers(&mut self, db: &Database, passengers: u8) -> Result<()> {
        check_demand("passengers", passengers)?;
        self.update_field(db, "passengers", &passengers)?;
        self.passengers = passengers;
        Ok(())
    }

    /// Sets cargo demand on the 0-10 scale.
    pub fn set_cargo(&mut self, db: &Database, cargo: u8) -> Result<()> {
        check_demand("cargo", cargo)?;
        self.update_field(db, "cargo", &cargo)?;
        self.cargo = cargo;
        Ok(())
    }

    pub fn set_transfer_possible(&mut self, db: &Database, transfer_possible: bool) -> Result<()> {
        self.update_field(db, "transfer", &transfer_possible)?;
        self.transfer_possible = transfer_possible;
        Ok(())
    }

    pub fn set_country(&mut self, db: &Database, country: Option<&Country>) -> Result<()> {
        self.update_field(db, "country", &country.map(Country::id))?;
        self.country = country.cloned();
        Ok(())
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iata_code(&self) -> &str {
        &self.iata_code
    }

    /// Free-text size category as shown in the game.
    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn passengers(&self) -> u8 {
        self.passengers
    }

    pub fn cargo(&self) -> u8 {
        self.cargo
    }

    pub fn transfer_possible(&self) -> bool {
        self.transfer_possible
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }
}

fn check_demand(field: &str, value: u8) -> Result<()> {
    if value > MAX_DEMAND {
        Err(ModelError::invalid_input(field)
            .with_reason(format!("must be between 0 and {MAX_DEMAND}, got {value}")))
    } else {
        Ok(())
    }
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Airport {}

impl PartialOrd for Airport {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Airport {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
