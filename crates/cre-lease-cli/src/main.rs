mod commands;
mod input;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cam::CamArgs;
use commands::derived::DeriveArgs;
use commands::lease_term::LeaseTermArgs;
use commands::rent_roll::RentRollArgs;
use commands::ti_amortization::TiScheduleArgs;

/// Commercial lease financial calculations
#[derive(Parser)]
#[command(
    name = "crelease",
    version,
    about = "Commercial lease financial calculations",
    long_about = "A CLI for commercial lease calculations with decimal precision. \
                  Derives rent, TI allowance and CAM fields, allocates CAM expenses \
                  across tenants, amortizes financed tenant improvements and \
                  summarises rent rolls."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Date terms are measured from (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh derived fields (rent, TI allowance, CAM, remaining term)
    Derive(DeriveArgs),
    /// Allocate CAM expenses across tenants
    CamAllocate(CamArgs),
    /// Build a TI amortization schedule
    TiSchedule(TiScheduleArgs),
    /// Remaining, elapsed and total months of a lease
    LeaseTerm(LeaseTermArgs),
    /// Summarise a building's rent roll
    RentRoll(RentRollArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Derive(args) => commands::derived::run_derive(args, as_of),
        Commands::CamAllocate(args) => commands::cam::run_cam_allocation(args, as_of),
        Commands::TiSchedule(args) => commands::ti_amortization::run_ti_schedule(args),
        Commands::LeaseTerm(args) => commands::lease_term::run_lease_term(args, as_of),
        Commands::RentRoll(args) => commands::rent_roll::run_rent_roll(args, as_of),
        Commands::Version => {
            println!("crelease {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
