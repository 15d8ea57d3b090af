//! ASxcel CLI Application
//!
//! Command-line front end for the ASxcel route planner. The store is opened
//! and upgraded before any command runs. Any failure, including a failed
//! upgrade, is printed to stderr with its causes and ends the process with
//! exit code 1.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use asxcel_core::{ModelBuilder, OperationStatus};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        // `{:#}` joins the context chain into one line.
        eprint!("{}", OperationStatus::failure(format!("{e:#}")));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let Args {
        database_file,
        no_color,
        json,
        enterprise,
        command,
    } = args;

    let mut model = ModelBuilder::new()
        .with_database_path(database_file)
        .build()
        .context("Failed to open the ASxcel store")?;

    if let Some(name) = &enterprise {
        model
            .load_enterprise(name)
            .with_context(|| format!("Failed to activate enterprise '{name}'"))?;
    }

    info!("ASxcel started");

    let mut cli = Cli::new(model, TerminalRenderer::new(!no_color), json);
    match command {
        Some(Airport { command }) => cli.handle_airport_command(command)?,
        Some(Country { command }) => cli.handle_country_command(command)?,
        Some(Enterprise { command }) => cli.handle_enterprise_command(command)?,
        Some(Route { command }) => cli.handle_route_command(command)?,
        Some(Config { command }) => cli.handle_config_command(command)?,
        Some(Status) => cli.show_status()?,
        None => cli.show_enterprise()?,
    }
    cli.finish()
}
