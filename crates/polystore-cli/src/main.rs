//! Polystore CLI
//!
//! Command-line interface for the dual-store persistence layer

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "polystore")]
#[command(about = "Polystore - chained dual-store persistence", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve configuration into a connection descriptor and print it
    Resolve(commands::resolve::ResolveArgs),
    /// Seed both stores in one chained transaction and run the query suite
    Demo(commands::demo::DemoArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Demo(args) => commands::demo::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
