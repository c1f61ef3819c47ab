//! `carton dashboard`: read back the scaled table and print it

use anyhow::{Context, Result};
use colored::*;

use super::DashboardCommands;
use crate::dashboard::{parse_pivot, render_text, write_pivot_csv};
use crate::sink::HttpSink;

pub async fn handle_dashboard_command(args: DashboardCommands) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = args.sink.load_config()?;
    config.validate(true)?;

    let sink = HttpSink::new(config.sink_url()?, config.timeout())?;
    let target_id = config.target_id()?;
    log::debug!("Reading sheet {} from {}", target_id, sink.url());

    let table = sink
        .fetch_ml(target_id)
        .await
        .with_context(|| format!("Failed to load the ml table of sheet {}", target_id))?;
    let pivot = parse_pivot(&table);
    if pivot.is_empty() {
        log::warn!("Sheet {} has no contact rows", target_id);
    }

    print!("{}", render_text(&pivot, !args.no_color));
    println!();
    println!(
        "{} contacts, {} days",
        pivot.contacts.len().to_string().bold(),
        pivot.days.len().to_string().bold()
    );

    if let Some(path) = &args.csv {
        write_pivot_csv(&pivot, path)?;
        println!("CSV saved to: {}", path.display().to_string().bright_green());
    }

    if args.latest {
        let latest = sink
            .latest_tracking()
            .await
            .context("Failed to look up the latest tracking file")?;
        match (latest.found, latest.name, latest.url) {
            (true, name, url) => println!(
                "Latest tracking file: {} {}",
                name.unwrap_or_else(|| "(unnamed)".to_string()).cyan(),
                url.unwrap_or_default().dimmed()
            ),
            _ => println!("{}", "No tracking file found".yellow()),
        }
    }
    Ok(())
}
