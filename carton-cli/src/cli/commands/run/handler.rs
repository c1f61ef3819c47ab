//! `carton run`: reconcile both workbooks and submit the results

use anyhow::{Context, Result};
use colored::*;

use super::RunCommands;
use crate::excel::write_tables_excel;
use crate::pipeline::{RunRequest, run_pipeline};
use crate::reconcile::Table;
use crate::sink::{HttpSink, Sink};

pub async fn handle_run_command(args: RunCommands) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = args.sink.load_config()?;
    if let Some(secret) = &args.secret {
        config.sink.secret = secret.clone();
    }
    if let Some(scale) = args.scale {
        config.pipeline.scale_factor = scale;
    }
    if let Some(columns) = &args.tracking_columns {
        config.columns.tracking = Some(columns.clone());
    }
    if let Some(columns) = &args.extraction_columns {
        config.columns.extraction = Some(columns.clone());
    }

    // Nothing is read before the configuration is known to be usable
    config.validate(!args.dry_run)?;
    let (tracking_columns, extraction_columns) = config.column_refs()?;

    let sink = if args.dry_run {
        None
    } else {
        Some(HttpSink::new(config.sink_url()?, config.timeout())?)
    };

    let request = RunRequest {
        tracking: args.tracking,
        extraction: args.extraction,
        tracking_columns,
        extraction_columns,
        scale_factor: config.pipeline.scale_factor,
        secret: config.sink.secret.clone(),
        target_id: config.sink.target_id.clone().unwrap_or_default(),
    };

    println!("Reconciling {} and {}...", request.tracking.display(), request.extraction.display());
    let outcome = run_pipeline(request, sink.as_ref().map(|s| s as &dyn Sink)).await?;

    if outcome.merged.is_empty() {
        log::warn!("Neither workbook produced any contact");
    }

    if let Some(path) = &args.export {
        write_tables_excel(path, &[("resultats", &outcome.merged), ("ml", &outcome.scaled)])
            .context("Failed to export result tables")?;
        println!("Tables saved to: {}", path.display().to_string().bright_green());
    }

    println!();
    print_summary("resultats", &outcome.merged);
    print_summary("ml", &outcome.scaled);
    println!("Run id: {}", outcome.run_id.to_string().dimmed());

    match &outcome.ack {
        Some(ack) => {
            let body = serde_json::to_string(ack).unwrap_or_default();
            println!("{} Sink acknowledged: {}", "✓".bright_green().bold(), body);
        }
        None => println!("{} Dry run, nothing was submitted", "•".yellow().bold()),
    }
    Ok(())
}

fn print_summary(name: &str, table: &Table) {
    println!(
        "  {:<10} {} contacts, {} day columns",
        name.bold(),
        table.rows.len(),
        table.headers.len().saturating_sub(1)
    );
}
