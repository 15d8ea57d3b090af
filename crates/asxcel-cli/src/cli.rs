//! Subcommand definitions and their handlers.
//!
//! Each subcommand is a clap derive type; [`Cli`] turns a parsed command
//! into Model calls and prints the result either as markdown (through the
//! [`TerminalRenderer`]) or as JSON.

use std::fmt::{self, Display};

use anyhow::{Context, Result};
use asxcel_core::{
    display::{Airports, Countries, CreateResult, OperationStatus, RoutesTable, UpdateResult},
    Model, ModelError, UpdateManager,
};
use clap::{ArgAction, Args, Subcommand};
use log::debug;
use serde::Serialize;

use crate::renderer::TerminalRenderer;

const NO_ENTERPRISE: &str = "No enterprise is active; pass --enterprise <NAME>";
const DEMAND_RANGE: std::ops::RangeInclusive<i64> = 0..=10;

/// Airport commands
#[derive(Subcommand)]
pub enum AirportCommands {
    /// Create an airport, or show it if it exists
    #[command(alias = "c")]
    Create(AirportNameArgs),
    /// List airports, scoped to the active enterprise if there is one
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show one airport
    #[command(alias = "s")]
    Show(AirportNameArgs),
    /// Change airport details
    Set(SetAirportArgs),
    /// Delete an airport that no enterprise or route uses
    #[command(aliases = ["d", "rm"])]
    Delete(AirportNameArgs),
    /// Airports a new route from this airport could go to
    Destinations(AirportNameArgs),
}

#[derive(Args)]
pub struct AirportNameArgs {
    /// Name of the airport
    pub name: String,
}

#[derive(Args)]
pub struct SetAirportArgs {
    /// Name of the airport to change
    pub name: String,
    /// Three-letter IATA code
    #[arg(long)]
    pub iata: Option<String>,
    /// Size category as shown in the game
    #[arg(long)]
    pub size: Option<String>,
    /// Passenger demand, 0 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(DEMAND_RANGE))]
    pub passengers: Option<u8>,
    /// Cargo demand, 0 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(DEMAND_RANGE))]
    pub cargo: Option<u8>,
    /// Whether passengers can transfer here
    #[arg(long)]
    pub transfer: Option<bool>,
    /// Country the airport lies in; created if unknown
    #[arg(long, conflicts_with = "no_country")]
    pub country: Option<String>,
    /// Clear the country
    #[arg(long)]
    pub no_country: bool,
    /// New name for the airport
    #[arg(long)]
    pub rename: Option<String>,
}

/// Country commands
#[derive(Subcommand)]
pub enum CountryCommands {
    /// Create a country, or show it if it exists
    #[command(alias = "c")]
    Create {
        /// Name of the country
        name: String,
    },
    /// List countries
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Enterprise commands
#[derive(Subcommand)]
pub enum EnterpriseCommands {
    /// Create an enterprise founded at a main hub
    #[command(alias = "c")]
    Create {
        /// Name of the enterprise
        name: String,
        /// Main hub airport; created if unknown
        #[arg(long)]
        hub: String,
    },
    /// List enterprises
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show an enterprise and its routes
    #[command(alias = "s")]
    Show {
        /// Name of the enterprise; defaults to --enterprise
        name: Option<String>,
    },
    /// Delete an enterprise with its routes
    #[command(aliases = ["d", "rm"])]
    Delete {
        /// Name of the enterprise
        name: String,
    },
}

/// Route commands
#[derive(Subcommand)]
pub enum RouteCommands {
    /// Create a route, or show it if the enterprise flies it already
    #[command(alias = "c")]
    Create(RouteArgs),
    /// Show the routes table
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show one route
    #[command(alias = "s")]
    Show(RouteArgs),
    /// Change route figures
    Set(SetRouteArgs),
    /// Delete a route
    #[command(aliases = ["d", "rm"])]
    Delete(RouteArgs),
}

#[derive(Args)]
pub struct RouteArgs {
    /// Origin airport
    pub origin: String,
    /// Destination airport
    pub destination: String,
}

#[derive(Args)]
pub struct SetRouteArgs {
    #[command(flatten)]
    pub route: RouteArgs,
    /// Distance in kilometres
    #[arg(long)]
    pub distance: Option<i64>,
    /// Load towards the destination
    #[arg(long)]
    pub load_to: Option<i64>,
    /// Load back from the destination
    #[arg(long)]
    pub load_from: Option<i64>,
    /// Whether the route is scheduled
    #[arg(long)]
    pub scheduled: Option<bool>,
}

/// Settings commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show all settings
    Show,
    /// Emphasise scheduled routes in the routes table
    HighlightScheduled {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

/// Store summary printed by `asxcel status`.
#[derive(Serialize)]
struct StatusReport {
    store: String,
    schema_version: i64,
    enterprises: Vec<String>,
    active_enterprise: Option<String>,
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Store: {}", self.store)?;
        writeln!(f, "- Schema version: {}", self.schema_version)?;
        writeln!(f, "- Enterprises: {}", self.enterprises.len())?;
        if let Some(name) = &self.active_enterprise {
            writeln!(f, "- Active enterprise: {name}")?;
        }
        Ok(())
    }
}

/// Markdown bullet list of enterprise names.
struct EnterpriseNames<'a>(&'a [String]);

impl Display for EnterpriseNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No enterprises found.");
        }
        for name in self.0 {
            writeln!(f, "- {name}")?;
        }
        Ok(())
    }
}

/// Points at `--enterprise` when a command needed an active enterprise.
fn explain(error: ModelError) -> anyhow::Error {
    match error {
        ModelError::NoActiveEnterprise => {
            anyhow::anyhow!(NO_ENTERPRISE)
        }
        other => other.into(),
    }
}

/// Runs parsed commands against a Model.
pub struct Cli {
    model: Model,
    renderer: TerminalRenderer,
    json: bool,
}

impl Cli {
    pub fn new(model: Model, renderer: TerminalRenderer, json: bool) -> Self {
        Self {
            model,
            renderer,
            json,
        }
    }

    /// Shuts the store down after the command ran.
    pub fn finish(self) -> Result<()> {
        self.model.close().context("Failed to close the store")
    }

    /// Prints `value` as JSON or `markdown` through the renderer.
    fn emit<T, D>(&self, value: &T, markdown: D) -> Result<()>
    where
        T: Serialize + ?Sized,
        D: Display,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        } else {
            self.renderer.render(&markdown.to_string())
        }
    }

    fn status(&self, message: String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
            Ok(())
        } else {
            self.renderer
                .render(&OperationStatus::success(message).to_string())
        }
    }

    pub fn handle_airport_command(&mut self, command: AirportCommands) -> Result<()> {
        match command {
            AirportCommands::Create(args) => {
                let airport = self.model.create_airport(&args.name)?.clone();
                self.emit(&airport, CreateResult::new(&airport))
            }
            AirportCommands::List => {
                let airports = self.model.airports();
                self.emit(airports, Airports(airports))
            }
            AirportCommands::Show(args) => {
                let airport = self
                    .model
                    .airport(&args.name)
                    .with_context(|| format!("Airport '{}' not found", args.name))?;
                self.emit(airport, airport)
            }
            AirportCommands::Set(args) => self.set_airport(args),
            AirportCommands::Delete(args) => {
                self.model
                    .delete_airport(&args.name)
                    .with_context(|| format!("Failed to delete airport '{}'", args.name))?;
                self.status(format!("Deleted airport '{}'", args.name))
            }
            AirportCommands::Destinations(args) => {
                let destinations = self
                    .model
                    .available_destinations(&args.name)
                    .map_err(explain)?
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                self.emit(&destinations, Airports(&destinations))
            }
        }
    }

    fn set_airport(&mut self, args: SetAirportArgs) -> Result<()> {
        let country = match (&args.country, args.no_country) {
            (Some(name), _) => Some(Some(self.model.create_country(name)?.clone())),
            (None, true) => Some(None),
            (None, false) => None,
        };

        let mut changes = Vec::new();
        self.model.with_airport(&args.name, |db, airport| {
            if let Some(iata) = &args.iata {
                airport.set_iata_code(db, iata)?;
                changes.push(format!("IATA code: {}", airport.iata_code()));
            }
            if let Some(size) = &args.size {
                airport.set_size(db, size)?;
                changes.push(format!("Size: {size}"));
            }
            if let Some(passengers) = args.passengers {
                airport.set_passengers(db, passengers)?;
                changes.push(format!("Passengers: {passengers}"));
            }
            if let Some(cargo) = args.cargo {
                airport.set_cargo(db, cargo)?;
                changes.push(format!("Cargo: {cargo}"));
            }
            if let Some(transfer) = args.transfer {
                airport.set_transfer_possible(db, transfer)?;
                changes.push(format!("Transfer: {transfer}"));
            }
            if let Some(country) = &country {
                airport.set_country(db, country.as_ref())?;
                match country {
                    Some(country) => changes.push(format!("Country: {country}")),
                    None => changes.push("Country: cleared".to_string()),
                }
            }
            if let Some(new_name) = &args.rename {
                airport.set_name(db, new_name)?;
                changes.push(format!("Name: {new_name}"));
            }
            Ok(())
        })?;
        debug!("Applied {} change(s) to airport '{}'", changes.len(), args.name);

        let name = args.rename.as_deref().unwrap_or(&args.name);
        let airport = self
            .model
            .airport(name)
            .with_context(|| format!("Airport '{name}' not found"))?;
        self.emit(airport, UpdateResult::with_changes(airport, changes))
    }

    pub fn handle_country_command(&mut self, command: CountryCommands) -> Result<()> {
        match command {
            CountryCommands::Create { name } => {
                let country = self.model.create_country(&name)?.clone();
                self.emit(&country, CreateResult::new(&country))
            }
            CountryCommands::List => {
                let countries = self.model.countries();
                self.emit(countries, Countries(countries))
            }
        }
    }

    pub fn handle_enterprise_command(&mut self, command: EnterpriseCommands) -> Result<()> {
        match command {
            EnterpriseCommands::Create { name, hub } => {
                let enterprise = self
                    .model
                    .create_enterprise(&name, &hub)
                    .with_context(|| format!("Failed to create enterprise '{name}'"))?
                    .clone();
                self.emit(&enterprise, CreateResult::new(&enterprise))
            }
            EnterpriseCommands::List => {
                let names = self.model.enterprise_names()?;
                self.emit(&names, EnterpriseNames(&names))
            }
            EnterpriseCommands::Show { name } => {
                if let Some(name) = name {
                    self.model.load_enterprise(&name)?;
                }
                self.show_enterprise()
            }
            EnterpriseCommands::Delete { name } => {
                self.model
                    .delete_enterprise(&name)
                    .with_context(|| format!("Failed to delete enterprise '{name}'"))?;
                self.status(format!("Deleted enterprise '{name}'"))
            }
        }
    }

    /// The active enterprise followed by its routes table. Also the output
    /// of `asxcel` without a command.
    pub fn show_enterprise(&self) -> Result<()> {
        let Some(enterprise) = self.model.enterprise() else {
            let names = self.model.enterprise_names()?;
            return self.emit(&names, EnterpriseNames(&names));
        };

        let table = RoutesTable::new(enterprise.routes())
            .with_highlight(self.model.configuration().highlight_scheduled_routes());
        self.emit(enterprise, format!("{enterprise}\n{table}"))
    }

    pub fn handle_route_command(&mut self, command: RouteCommands) -> Result<()> {
        match command {
            RouteCommands::Create(RouteArgs {
                origin,
                destination,
            }) => {
                let route = self
                    .model
                    .create_route(&origin, &destination)
                    .map_err(explain)?
                    .clone();
                self.emit(&route, CreateResult::new(&route))
            }
            RouteCommands::List => {
                let enterprise = self
                    .model
                    .enterprise()
                    .context(NO_ENTERPRISE)?;
                let table = RoutesTable::new(enterprise.routes())
                    .with_highlight(self.model.configuration().highlight_scheduled_routes());
                self.emit(enterprise.routes(), table)
            }
            RouteCommands::Show(RouteArgs {
                origin,
                destination,
            }) => {
                let route = self
                    .model
                    .enterprise()
                    .context(NO_ENTERPRISE)?
                    .route(&origin, &destination)
                    .with_context(|| format!("Route '{origin} - {destination}' not found"))?;
                self.emit(route, route)
            }
            RouteCommands::Set(args) => self.set_route(args),
            RouteCommands::Delete(RouteArgs {
                origin,
                destination,
            }) => {
                self.model
                    .delete_route(&origin, &destination)
                    .map_err(explain)?;
                self.status(format!("Deleted route '{origin} - {destination}'"))
            }
        }
    }

    fn set_route(&mut self, args: SetRouteArgs) -> Result<()> {
        let RouteArgs {
            origin,
            destination,
        } = &args.route;

        let mut changes = Vec::new();
        self.model.with_route(origin, destination, |db, route| {
            if let Some(distance) = args.distance {
                route.set_distance(db, distance)?;
                changes.push(format!("Distance: {distance}"));
            }
            if let Some(load_to) = args.load_to {
                route.set_load_to(db, load_to)?;
                changes.push(format!("Loads to: {load_to}"));
            }
            if let Some(load_from) = args.load_from {
                route.set_load_from(db, load_from)?;
                changes.push(format!("Loads from: {load_from}"));
            }
            if let Some(scheduled) = args.scheduled {
                route.set_scheduled(db, scheduled)?;
                changes.push(format!("Scheduled: {scheduled}"));
            }
            Ok(())
        })
        .map_err(explain)?;

        let route = self
            .model
            .enterprise()
            .and_then(|e| e.route(origin, destination))
            .with_context(|| format!("Route '{origin} - {destination}' not found"))?;
        self.emit(route, UpdateResult::with_changes(route, changes))
    }

    pub fn handle_config_command(&mut self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::Show => {
                let config = self.model.configuration();
                let markdown = format!(
                    "- Highlight scheduled routes: {}\n",
                    config.highlight_scheduled_routes()
                );
                self.emit(config, markdown)
            }
            ConfigCommands::HighlightScheduled { enabled } => {
                self.model.set_highlight_scheduled_routes(enabled)?;
                self.status(format!("Highlight scheduled routes: {enabled}"))
            }
        }
    }

    pub fn show_status(&self) -> Result<()> {
        let db = self.model.database();
        let report = StatusReport {
            store: db.path().display().to_string(),
            schema_version: UpdateManager::new(db).detect_version()?,
            enterprises: self.model.enterprise_names()?,
            active_enterprise: self.model.enterprise().map(|e| e.name().to_string()),
        };
        self.emit(&report, &report)
    }
}
