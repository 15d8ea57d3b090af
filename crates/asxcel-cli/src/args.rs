use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{AirportCommands, ConfigCommands, CountryCommands, EnterpriseCommands, RouteCommands};

/// Track AirlineSim airports, enterprises and routes
///
/// ASxcel keeps the airports you care about, the enterprises you run and the
/// routes they fly in a local SQLite store, and prints them as markdown
/// tables. The store is upgraded automatically when it was written by an
/// older release.
#[derive(Parser)]
#[command(version, about, name = "asxcel")]
pub struct Args {
    /// Path to the SQLite store. Defaults to
    /// $XDG_DATA_HOME/asxcel/asxcel.sqlite
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Enterprise to activate before running the command. Route commands
    /// need one; airport commands are scoped to it when given.
    #[arg(short, long, global = true)]
    pub enterprise: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the ASxcel CLI
///
/// Without a command, the routes of `--enterprise` are shown, or the list of
/// enterprises when none is given.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage airports
    #[command(alias = "a")]
    Airport {
        #[command(subcommand)]
        command: AirportCommands,
    },
    /// Manage countries
    #[command(alias = "c")]
    Country {
        #[command(subcommand)]
        command: CountryCommands,
    },
    /// Manage enterprises
    #[command(alias = "e")]
    Enterprise {
        #[command(subcommand)]
        command: EnterpriseCommands,
    },
    /// Manage the routes of the active enterprise
    #[command(alias = "r")]
    Route {
        #[command(subcommand)]
        command: RouteCommands,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show the store location and schema version
    Status,
}
