//! Display implementations for domain models.
//!
//! Every implementation writes markdown so the CLI can hand the text to its
//! terminal renderer unchanged.

use std::fmt;

use crate::models::{Airport, Country, Enterprise, Route, MAX_DEMAND};

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.iata_code().is_empty() {
            writeln!(f, "## {}", self.name())?;
        } else {
            writeln!(f, "## {} ({})", self.name(), self.iata_code())?;
        }
        writeln!(f)?;

        if let Some(country) = self.country() {
            writeln!(f, "- Country: {country}")?;
        }
        if !self.size().is_empty() {
            writeln!(f, "- Size: {}", self.size())?;
        }
        writeln!(f, "- Passengers: {}/{MAX_DEMAND}", self.passengers())?;
        writeln!(f, "- Cargo: {}/{MAX_DEMAND}", self.cargo())?;
        writeln!(
            f,
            "- Transfer: {}",
            if self.transfer_possible() { "yes" } else { "no" }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} → {}",
            self.origin().name(),
            self.destination().name()
        )?;
        writeln!(f)?;
        writeln!(f, "- Distance: {} km", self.distance())?;
        writeln!(f, "- Loads to: {}", self.load_to())?;
        writeln!(f, "- Loads from: {}", self.load_from())?;
        writeln!(
            f,
            "- Scheduled: {}",
            if self.is_scheduled() { "yes" } else { "no" }
        )
    }
}

impl fmt::Display for Enterprise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name())?;
        writeln!(f)?;

        match self.main_hub() {
            Some(hub) => writeln!(f, "- Main hub: {}", hub.name())?,
            None => writeln!(f, "- Main hub: none")?,
        }
        if let Some(country) = self.country() {
            writeln!(f, "- Country: {country}")?;
        }

        let scheduled = self.routes().iter().filter(|r| r.is_scheduled()).count();
        writeln!(
            f,
            "- Routes: {} ({scheduled} scheduled)",
            self.routes().len()
        )
    }
}
