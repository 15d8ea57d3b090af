//! Country entity.

use std::cmp::Ordering;

use serde::Serialize;

use super::{find_or_create, required_i64, required_text, validate_name};
use crate::{
    db::{Database, QueryResult},
    error::Result,
};

const SELECT_COUNTRY_SQL: &str = "SELECT id, name FROM countries WHERE name = ?1 LIMIT 1";
const INSERT_COUNTRY_SQL: &str = "INSERT INTO countries (name) VALUES (?1)";
const SELECT_ALL_COUNTRIES_SQL: &str = "SELECT id, name FROM countries";

/// A country airports and enterprises can belong to. Names are unique.
#[derive(Debug, Clone, Serialize)]
pub struct Country {
    id: i64,
    name: String,
}

impl Country {
    /// Returns the country called `name`, creating it if needed.
    pub fn sync(db: &Database, name: &str) -> Result<Self> {
        validate_name("country", name)?;

        find_or_create(
            "Country",
            name,
            || Self::find(db, name),
            || db.update(INSERT_COUNTRY_SQL, [name]),
        )
    }

    /// Looks a country up without creating it.
    pub fn find(db: &Database, name: &str) -> Result<Option<Self>> {
        let mut result = db.query(SELECT_COUNTRY_SQL, [name])?;
        if result.next() {
            Self::from_result(&result).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Builds a country from the current row of a result with `id` and
    /// `name` columns.
    pub fn from_result(result: &QueryResult) -> Result<Self> {
        Ok(Self {
            id: required_i64(result, "id")?,
            name: required_text(result, "name")?,
        })
    }

    /// Builds a country from the `country_id`/`country_name` columns of a
    /// joined row; `None` when the join found nothing.
    pub(crate) fn from_joined(result: &QueryResult, prefix: &str) -> Option<Self> {
        let id = result.get_i64_by_name(&format!("{prefix}country_id"))?;
        let name = result.get_by_name(&format!("{prefix}country_name"))?;
        Some(Self {
            id,
            name: name.to_string(),
        })
    }

    /// Every country in the store, sorted by name.
    pub fn load_all(db: &Database) -> Result<Vec<Self>> {
        let mut result = db.query(SELECT_ALL_COUNTRIES_SQL, [])?;
        let mut countries = Vec::with_capacity(result.row_count());
        while result.next() {
            countries.push(Self::from_result(&result)?);
        }
        countries.sort();
        Ok(countries)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Country {}

impl PartialOrd for Country {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Country {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
