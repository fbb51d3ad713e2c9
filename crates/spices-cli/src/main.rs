mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if run_app().is_err() {
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("SPICES CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = dispatch(cli);
    if let Err(e) = &command_result {
        error!("Command failed: {}", e);
        eprintln!("❌ Command failed: {}", e);
    }
    command_result
}

fn dispatch(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    let catalog = commands::load_catalog(cli.catalog.as_deref())?;
    match cli.command {
        Commands::Validate(args) => {
            info!("Dispatching to 'validate' command.");
            println!("{}", commands::notation::validate(&args, catalog));
        }
        Commands::Convert(args) => {
            info!("Dispatching to 'convert' command.");
            println!("{}", commands::notation::convert(&args, catalog)?);
        }
        Commands::Translate(args) => {
            info!("Dispatching to 'translate' command.");
            println!("{}", commands::notation::translate(&args, catalog)?);
        }
        Commands::Charge(args) => {
            info!("Dispatching to 'charge' command.");
            println!("{}", commands::notation::charge(&args, catalog)?);
        }
        Commands::Symbols(args) => {
            info!("Dispatching to 'symbols' command.");
            println!("{}", commands::notation::symbols(&args, catalog));
        }
        Commands::Map(args) => {
            info!("Dispatching to 'map' command.");
            commands::map::run(args, catalog, quiet)?;
        }
        Commands::Assemblies(args) => {
            info!("Dispatching to 'assemblies' command.");
            commands::map::assemblies(args, catalog)?;
        }
    }
    info!("Command completed successfully.");
    Ok(())
}
