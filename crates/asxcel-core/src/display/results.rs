//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Airport, Country, Enterprise, Route};

/// Wrapper type for displaying the result of create operations.
///
/// Create operations are find-or-create, so the wrapper does not claim the
/// entity is new; it prints a headline naming it, then its details.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<&Airport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Airport '{}' (ID: {})",
            self.resource.name(),
            self.resource.id()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<&Country> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Country '{}' (ID: {})",
            self.resource.name(),
            self.resource.id()
        )
    }
}

impl fmt::Display for CreateResult<&Enterprise> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Active enterprise '{}' (ID: {})",
            self.resource.name(),
            self.resource.id()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<&Route> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route with ID: {}", self.resource.id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of fields that were changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            return writeln!(f, "Nothing to change.");
        }
        writeln!(f, "Changes made:")?;
        for change in &self.changes {
            writeln!(f, "- {change}")?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateResult<&Airport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated airport with ID: {}", self.resource.id())?;
        writeln!(f)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<&Route> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated route with ID: {}", self.resource.id())?;
        writeln!(f)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::model::ModelBuilder;

    #[test]
    fn test_create_and_update_results() {
        let temp_dir = TempDir::new().unwrap();
        let mut model = ModelBuilder::new()
            .with_database_path(Some(temp_dir.path().join("asxcel.sqlite")))
            .build()
            .unwrap();

        let airport = model.create_airport("Schiphol").unwrap();
        let output = format!("{}", CreateResult::new(airport));
        assert!(output.starts_with("Airport 'Schiphol' (ID: 1)"));
        assert!(output.contains("## Schiphol"));
        assert!(output.contains("- Passengers: 0/10"));

        model
            .with_airport("Schiphol", |db, airport| airport.set_cargo(db, 7))
            .unwrap();
        let airport = model.airport("Schiphol").unwrap();
        let output = format!(
            "{}",
            UpdateResult::with_changes(airport, vec!["cargo: 7".to_string()])
        );
        assert!(output.contains("Changes made:\n- cargo: 7"));
        assert!(output.contains("- Cargo: 7/10"));

        let output = format!("{}", UpdateResult::with_changes(airport, Vec::new()));
        assert!(output.contains("Nothing to change."));
    }
}
