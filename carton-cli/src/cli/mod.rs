pub mod commands;

use clap::{Parser, Subcommand};

use commands::dashboard::DashboardCommands;
use commands::run::RunCommands;

#[derive(Parser, Debug)]
#[command(
    name = "carton",
    version,
    about = "Reconcile tracking and extraction workbooks into per-day contact totals"
)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate both workbooks, merge, scale and submit the results
    Run(RunCommands),
    /// Show the scaled table currently stored in the sink
    Dashboard(DashboardCommands),
}
