//! Decode the first worksheet of a workbook into a [`Grid`]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};

use crate::reconcile::{Cell, Grid};

/// Read the first sheet of an `.xlsx`/`.xls`/`.xlsb`/`.ods` file
///
/// Date cells come back as their raw serial numbers, matching what the
/// coercion layer expects from a spreadsheet.
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .with_context(|| format!("Workbook has no sheets: {}", path.display()))?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    log::debug!(
        "Read {} rows from sheet '{}' of {}",
        rows.len(),
        sheet_name,
        path.display()
    );
    let grid = Grid::new(rows);
    if grid.is_empty() {
        log::warn!("Sheet '{}' of {} is empty", sheet_name, path.display());
    }
    Ok(grid)
}

/// Decode two workbooks concurrently on the blocking pool
pub async fn read_grids(first: PathBuf, second: PathBuf) -> Result<(Grid, Grid)> {
    let first_task = tokio::task::spawn_blocking(move || read_grid(first));
    let second_task = tokio::task::spawn_blocking(move || read_grid(second));

    let (first, second) = tokio::try_join!(
        async { first_task.await.context("Workbook decoding task failed")? },
        async { second_task.await.context("Workbook decoding task failed")? },
    )?;
    Ok((first, second))
}

/// Convert a calamine cell to a raw [`Cell`]
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::coerce::coerce_date;
    use rust_xlsxwriter::{Format, Workbook};

    fn write_sample(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "contact").unwrap();
        sheet.write_string(0, 2, "day").unwrap();
        sheet.write_string(0, 3, "amount").unwrap();

        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_string(1, 1, "alice").unwrap();
        sheet
            .write_number_with_format(1, 2, 45000.0, &date_format)
            .unwrap();
        sheet.write_string(1, 3, "2,5").unwrap();

        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_string(2, 1, "bob").unwrap();
        sheet.write_string(2, 2, "16/03/2023").unwrap();
        sheet.write_boolean(2, 3, true).unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_grid_from_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracking.xlsx");
        write_sample(&path);

        let grid = read_grid(&path).unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.header_labels(), vec!["id", "contact", "day", "amount"]);
        assert_eq!(grid.cell(1, 0), &Cell::Number(1.0));
        assert_eq!(grid.cell(1, 1), &Cell::from("alice"));
        assert_eq!(coerce_date(grid.cell(1, 2)), Some("2023-03-15".to_string()));
        assert_eq!(grid.cell(1, 3), &Cell::from("2,5"));
        assert_eq!(grid.cell(2, 3), &Cell::Bool(true));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_grid("/nonexistent/carton/input.xlsx").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/carton/input.xlsx"));
    }

    #[tokio::test]
    async fn test_read_grids_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        write_sample(&a);
        write_sample(&b);

        let (ga, gb) = read_grids(a, b).await.unwrap();
        assert_eq!(ga, gb);
    }
}
