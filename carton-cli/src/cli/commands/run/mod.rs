pub mod handler;

pub use handler::handle_run_command;

use std::path::PathBuf;

use clap::Args;

use super::SinkArgs;
use crate::reconcile::ColumnRefs;

#[derive(Args, Debug)]
pub struct RunCommands {
    /// Tracking workbook (.xlsx)
    #[arg(long)]
    pub tracking: PathBuf,

    /// Extraction workbook (.xlsx)
    #[arg(long)]
    pub extraction: PathBuf,

    /// Column letters for the tracking workbook as key,user,sum,date,head
    #[arg(long, value_name = "LETTERS")]
    pub tracking_columns: Option<ColumnRefs>,

    /// Column letters for the extraction workbook as key,user,sum,date,head
    #[arg(long, value_name = "LETTERS")]
    pub extraction_columns: Option<ColumnRefs>,

    #[command(flatten)]
    pub sink: SinkArgs,

    /// Shared secret sent with the submission
    #[arg(long)]
    pub secret: Option<String>,

    /// Multiplier applied to the merged table
    #[arg(long)]
    pub scale: Option<f64>,

    /// Compute everything but do not submit
    #[arg(long)]
    pub dry_run: bool,

    /// Also write both tables to this .xlsx file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
