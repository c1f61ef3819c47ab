mod cli;
mod config;
mod dashboard;
mod excel;
mod pipeline;
mod reconcile;
mod sink;

use clap::Parser;
use colored::*;

use cli::commands::dashboard::handle_dashboard_command;
use cli::commands::run::handle_run_command;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => handle_run_command(args).await,
        Commands::Dashboard(args) => handle_dashboard_command(args).await,
    };

    if let Err(e) = result {
        log::debug!("{:?}", e);
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

/// RUST_LOG wins; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,carton=debug" } else { "warn,carton=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}
