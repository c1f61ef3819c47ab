pub mod handler;

pub use handler::handle_dashboard_command;

use std::path::PathBuf;

use clap::Args;

use super::SinkArgs;

#[derive(Args, Debug)]
pub struct DashboardCommands {
    #[command(flatten)]
    pub sink: SinkArgs,

    /// Write the table with totals to a CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Also show the most recent tracking file known to the sink
    #[arg(long)]
    pub latest: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
