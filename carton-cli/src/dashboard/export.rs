//! CSV export of a [`Pivot`] with its totals

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::Pivot;
use crate::reconcile::CONTACT_HEADER;

/// Write the pivot as CSV: one row per contact, then a Total row
pub fn write_pivot_csv<P: AsRef<Path>>(pivot: &Pivot, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    let mut header = vec![CONTACT_HEADER.to_string()];
    header.extend(pivot.days.iter().cloned());
    header.push("Total".to_string());
    wtr.write_record(&header).context("Failed to write CSV header")?;

    for ((contact, values), total) in pivot
        .contacts
        .iter()
        .zip(&pivot.matrix)
        .zip(pivot.row_totals())
    {
        let mut record = vec![contact.clone()];
        record.extend(values.iter().map(|v| format!("{:.2}", v)));
        record.push(format!("{:.2}", total));
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write row for contact: {}", contact))?;
    }

    let mut footer = vec!["Total".to_string()];
    footer.extend(pivot.column_totals().iter().map(|v| format!("{:.2}", v)));
    footer.push(format!("{:.2}", pivot.grand_total()));
    wtr.write_record(&footer).context("Failed to write totals row")?;

    wtr.flush().context("Failed to flush CSV writer")?;

    log::info!("CSV file exported to: {}", path.display());
    Ok(())
}
