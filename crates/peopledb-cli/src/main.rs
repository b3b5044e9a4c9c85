//! PeopleDB CLI
//!
//! Command-line interface over the people and address repositories

use clap::{Parser, Subcommand};
use peopledb_core::logging_facility::{self, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "peopledb")]
#[command(about = "PeopleDB - people, addresses and families in SQLite", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "PEOPLEDB_DB",
        default_value = ".peopledb/people.db"
    )]
    db: PathBuf,

    /// Log output format: pretty or json
    #[arg(long, global = true, env = "PEOPLEDB_LOG_FORMAT", default_value = "pretty")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the canonical schema
    Init,
    /// Person operations
    Person(commands::person::PersonArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli.db),
        Commands::Person(args) => commands::person::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
