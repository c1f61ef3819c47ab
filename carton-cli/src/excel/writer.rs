//! Export result tables to an Excel workbook

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::reconcile::{Cell, Table};

/// Write each `(sheet name, table)` pair to its own worksheet
pub fn write_tables_excel<P: AsRef<Path>>(path: P, sheets: &[(&str, &Table)]) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_table(worksheet, table, &header_format)
            .with_context(|| format!("Failed to write sheet: {}", name))?;
        worksheet.autofit();
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel file exported to: {}", path.display());
    Ok(())
}

fn write_table(ws: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    for (col, header) in table.headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, header, header_format)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    ws.write_number(row_num, col, *n)?;
                }
                Cell::Bool(b) => {
                    ws.write_boolean(row_num, col, *b)?;
                }
                Cell::Text(s) => {
                    ws.write_string(row_num, col, s)?;
                }
            }
        }
    }
    Ok(())
}
