mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocate::AllocateArgs;

/// Loan-to-facility allocation over rate-ranked facilities
#[derive(Parser)]
#[command(
    name = "lbk",
    version,
    about = "Loan-to-facility allocation over rate-ranked facilities",
    long_about = "Matches a batch of loan requests against lending facilities ranked by \
                  interest rate, honouring per-facility and bank-wide covenants, and \
                  writes the resulting loan assignments and accumulated facility yields \
                  as CSV tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for the run summary
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign loans to facilities and write the result tables
    Allocate(AllocateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Allocate(args) => commands::allocate::run_allocate(args),
        Commands::Version => {
            println!("lbk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(summary) => {
            output::format_output(&cli.output, &summary);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
