//! Collection wrapper types for displaying groups of domain objects.
//!
//! The wrappers borrow the Model's sorted slices and render them as
//! markdown tables or lists, with a one-line message for empty collections.

use std::fmt;

use super::escape_cell;
use crate::models::{Airport, Country, Route};

/// Newtype wrapper for displaying a list of airports as a table.
pub struct Airports<'a>(pub &'a [Airport]);

impl fmt::Display for Airports<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No airports found.");
        }

        writeln!(f, "| Name | IATA | Country | Size | PAX | Cargo | Transfer |")?;
        writeln!(f, "|:-|:-:|:-|:-|-:|-:|:-:|")?;
        for airport in self.0 {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {} | {} |",
                escape_cell(airport.name()),
                escape_cell(airport.iata_code()),
                airport
                    .country()
                    .map(|c| escape_cell(c.name()))
                    .unwrap_or_default(),
                escape_cell(airport.size()),
                airport.passengers(),
                airport.cargo(),
                if airport.transfer_possible() { "yes" } else { "" },
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of countries.
pub struct Countries<'a>(pub &'a [Country]);

impl fmt::Display for Countries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No countries found.");
        }
        for country in self.0 {
            writeln!(f, "- {country}")?;
        }
        Ok(())
    }
}

/// The routes spreadsheet: one row per route with both airports' demand
/// next to the route's own figures.
///
/// With highlighting on, the airport names of scheduled routes are printed
/// in bold.
pub struct RoutesTable<'a> {
    routes: &'a [Route],
    highlight_scheduled: bool,
}

impl<'a> RoutesTable<'a> {
    pub fn new(routes: &'a [Route]) -> Self {
        Self {
            routes,
            highlight_scheduled: true,
        }
    }

    pub fn with_highlight(mut self, highlight_scheduled: bool) -> Self {
        self.highlight_scheduled = highlight_scheduled;
        self
    }

    fn airport_name(&self, route: &Route, airport: &Airport) -> String {
        let name = escape_cell(airport.name());
        if self.highlight_scheduled && route.is_scheduled() {
            format!("**{name}**")
        } else {
            name
        }
    }
}

impl fmt::Display for RoutesTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.routes.is_empty() {
            return writeln!(f, "No routes found.");
        }

        writeln!(
            f,
            "| Origin | IATA | PAX | Cargo | Destination | IATA | PAX | Cargo \
             | Distance | Loads to | Loads from | Scheduled |"
        )?;
        writeln!(f, "|:-|:-:|-:|-:|:-|:-:|-:|-:|-:|-:|-:|:-:|")?;
        for route in self.routes {
            let origin = route.origin();
            let destination = route.destination();
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                self.airport_name(route, origin),
                escape_cell(origin.iata_code()),
                origin.passengers(),
                origin.cargo(),
                self.airport_name(route, destination),
                escape_cell(destination.iata_code()),
                destination.passengers(),
                destination.cargo(),
                route.distance(),
                route.load_to(),
                route.load_from(),
                if route.is_scheduled() { "✓" } else { "" },
            )?;
        }
        Ok(())
    }
}
