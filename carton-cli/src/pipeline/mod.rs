//! Run orchestration: decode, reconcile, then submit once
//!
//! A run either hands both finished tables to the sink in one request or
//! never calls it.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use crate::excel::read_grids;
use crate::reconcile::{
    ColumnRefs, Grid, Table, aggregate_with_stats, clean_grid, extract_records, merge_tables,
    scale_table,
};
use crate::sink::{Ack, Envelope, Sink};

/// Everything one run needs, resolved up front
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub tracking: PathBuf,
    pub extraction: PathBuf,
    pub tracking_columns: ColumnRefs,
    pub extraction_columns: ColumnRefs,
    pub scale_factor: f64,
    pub secret: String,
    pub target_id: String,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// Merged sums (`resultats`)
    pub merged: Table,
    /// Merged sums times the scale factor (`ml`)
    pub scaled: Table,
    /// `None` when no sink was given
    pub ack: Option<Ack>,
}

/// Execute a full run; pass no sink for a dry run
pub async fn run_pipeline(request: RunRequest, sink: Option<&dyn Sink>) -> Result<RunOutcome> {
    let run_id = Uuid::new_v4();

    for (label, path) in [("Tracking", &request.tracking), ("Extraction", &request.extraction)] {
        if !path.exists() {
            bail!("{} workbook does not exist: {}", label, path.display());
        }
    }

    log::info!(
        "[{}] Reading workbooks {} and {}",
        run_id,
        request.tracking.display(),
        request.extraction.display()
    );
    let (tracking, extraction) = read_grids(request.tracking.clone(), request.extraction.clone())
        .await
        .context("Failed to read input workbooks")?;

    let (merged, scaled) = reconcile_grids(
        run_id,
        (tracking, &request.tracking_columns),
        (extraction, &request.extraction_columns),
        request.scale_factor,
    )?;

    let ack = match sink {
        Some(sink) => {
            log::info!(
                "[{}] Submitting {} contacts to sheet {}",
                run_id,
                merged.rows.len(),
                request.target_id
            );
            let envelope =
                Envelope::new(request.secret, request.target_id, merged.clone(), scaled.clone());
            let ack = match sink.submit(&envelope).await {
                Ok(ack) => ack,
                Err(e) => {
                    if e.is_timeout() {
                        log::error!("[{}] Sink did not answer in time", run_id);
                    } else {
                        log::error!("[{}] Submission failed: {}", run_id, e);
                    }
                    return Err(e).context("Failed to submit results");
                }
            };
            log::info!("[{}] Sink acknowledged the submission", run_id);
            Some(ack)
        }
        None => {
            log::info!("[{}] Dry run, nothing submitted", run_id);
            None
        }
    };

    Ok(RunOutcome {
        run_id,
        merged,
        scaled,
        ack,
    })
}

/// Aggregate both sources, merge them and derive the scaled table
pub fn reconcile_grids(
    run_id: Uuid,
    tracking: (Grid, &ColumnRefs),
    extraction: (Grid, &ColumnRefs),
    scale_factor: f64,
) -> Result<(Table, Table)> {
    let tracking_table = process_source(run_id, "tracking", tracking.0, tracking.1)?;
    let extraction_table = process_source(run_id, "extraction", extraction.0, extraction.1)?;

    log::info!("[{}] Merging tables", run_id);
    let merged = merge_tables(&tracking_table, &extraction_table);

    log::info!("[{}] Scaling by {}", run_id, scale_factor);
    let scaled = scale_table(&merged, scale_factor);

    log::info!(
        "[{}] Result: {} contacts, {} day columns",
        run_id,
        merged.rows.len(),
        merged.headers.len().saturating_sub(1)
    );
    Ok((merged, scaled))
}

/// Clean, extract and aggregate one source grid
pub fn process_source(run_id: Uuid, source: &str, grid: Grid, columns: &ColumnRefs) -> Result<Table> {
    let (grid, report) = clean_grid(grid);
    if report.removed_duplicate_header {
        log::debug!("[{}] {}: removed repeated header row", run_id, source);
    }
    if report.removed_totals_row {
        log::debug!("[{}] {}: removed trailing totals row", run_id, source);
    }

    let records = extract_records(&grid);
    if records.is_empty() {
        log::warn!("[{}] {}: no data rows", run_id, source);
        return Ok(Table::empty());
    }

    let mapping = columns
        .resolve(&grid.header_labels())
        .with_context(|| format!("Invalid column letters for the {} workbook", source))?;
    log::debug!(
        "[{}] {}: key='{}' user='{}' sum='{}' date='{}' head='{}'",
        run_id,
        source,
        mapping.key,
        mapping.user,
        mapping.sum,
        mapping.date,
        mapping.head
    );

    let (table, stats) = aggregate_with_stats(&records, &mapping);
    log::info!(
        "[{}] {}: {} records, {} duplicates dropped, {} undated, {} contacts over {} days",
        run_id,
        source,
        stats.records,
        stats.duplicates,
        stats.undated,
        stats.contacts,
        stats.days
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::write_tables_excel;
    use crate::grid;
    use crate::reconcile::coerce::coerce_number;
    use crate::reconcile::{Cell, day_column};
    use crate::sink::SinkError;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every envelope; fails when built with a message
    struct FakeSink {
        received: Mutex<Vec<Envelope>>,
        fail_with: Option<String>,
    }

    impl FakeSink {
        fn ok() -> Self {
            Self {
                received: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                received: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sink for FakeSink {
        async fn submit(&self, envelope: &Envelope) -> Result<Ack, SinkError> {
            self.received.lock().unwrap().push(envelope.clone());
            match &self.fail_with {
                Some(message) => Err(SinkError::Rejected(message.clone())),
                None => Ok(Ack::from_body(r#"{"ok":true}"#)),
            }
        }
    }

    fn tracking_grid() -> Grid {
        grid![
            ["id", "contact", "day", "amount"],
            ["id", "contact", "day", "amount"],
            [1.0, "A", "2024-01-01", "5"],
            [1.0, "A", "2024-01-01", "999"],
            [2.0, "B", "2024-01-02", "3"],
            ["Total", "", "", "1007"],
        ]
    }

    fn extraction_grid() -> Grid {
        grid![
            ["ref", "who", "when", "qty", "label"],
            ["x1", "A", "2024-01-03", "2", "first"],
            ["x2", "C", "02/01/2024", "1,5", "second"],
            ["", "", "", "3,5", ""],
        ]
    }

    fn tracking_columns() -> ColumnRefs {
        ColumnRefs::from_list("A,B,D,C,B").unwrap()
    }

    fn extraction_columns() -> ColumnRefs {
        ColumnRefs::from_list("A,B,D,C,E").unwrap()
    }

    fn save_grid(path: &Path, grid: &Grid) {
        let rows = grid.rows();
        let table = Table::new(
            rows[0].iter().map(|c| c.to_text()).collect(),
            rows[1..].to_vec(),
        );
        write_tables_excel(path, &[("Sheet1", &table)]).unwrap();
    }

    fn request(dir: &Path) -> RunRequest {
        let tracking = dir.join("suivi.xlsx");
        let extraction = dir.join("extraction.xlsx");
        save_grid(&tracking, &tracking_grid());
        save_grid(&extraction, &extraction_grid());
        RunRequest {
            tracking,
            extraction,
            tracking_columns: tracking_columns(),
            extraction_columns: extraction_columns(),
            scale_factor: 0.35,
            secret: "s3cret".into(),
            target_id: "sheet-1".into(),
        }
    }

    fn row(contact: &str, values: &[f64]) -> Vec<Cell> {
        std::iter::once(Cell::from(contact))
            .chain(values.iter().map(|v| Cell::Number(*v)))
            .collect()
    }

    #[test]
    fn test_process_source_cleans_and_aggregates() {
        let table =
            process_source(Uuid::nil(), "tracking", tracking_grid(), &tracking_columns()).unwrap();

        assert_eq!(
            table.headers,
            vec![
                "Contact".to_string(),
                day_column("2024-01-01"),
                day_column("2024-01-02"),
            ]
        );
        assert_eq!(table.rows, vec![row("A", &[5.0, 0.0]), row("B", &[0.0, 3.0])]);
    }

    #[test]
    fn test_process_source_without_data_rows() {
        let grid = grid![["id", "contact"]];
        let table = process_source(Uuid::nil(), "tracking", grid, &tracking_columns()).unwrap();
        assert_eq!(table, Table::empty());
    }

    #[test]
    fn test_column_beyond_header_fails() {
        let columns = ColumnRefs::from_list("A,B,Z,C,D").unwrap();
        let err = process_source(Uuid::nil(), "tracking", tracking_grid(), &columns).unwrap_err();
        assert!(format!("{:#}", err).contains("Column Z (sum)"));
    }

    #[test]
    fn test_reconcile_merges_then_scales() {
        let (merged, scaled) = reconcile_grids(
            Uuid::nil(),
            (tracking_grid(), &tracking_columns()),
            (extraction_grid(), &extraction_columns()),
            0.35,
        )
        .unwrap();

        assert_eq!(
            merged.headers,
            vec![
                "Contact".to_string(),
                day_column("2024-01-01"),
                day_column("2024-01-02"),
                day_column("2024-01-03"),
            ]
        );
        assert_eq!(
            merged.rows,
            vec![
                row("A", &[5.0, 0.0, 2.0]),
                row("B", &[0.0, 3.0, 0.0]),
                row("C", &[0.0, 1.5, 0.0]),
            ]
        );

        assert_eq!(scaled.headers, merged.headers);
        for (m, s) in merged.rows.iter().zip(&scaled.rows) {
            assert_eq!(m[0], s[0]);
            for (mv, sv) in m.iter().zip(s).skip(1) {
                assert_eq!(*sv, Cell::Number(coerce_number(mv) * 0.35));
            }
        }
    }

    #[tokio::test]
    async fn test_run_submits_both_tables_once() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FakeSink::ok();

        let outcome = run_pipeline(request(dir.path()), Some(&sink)).await.unwrap();

        assert_eq!(outcome.ack.and_then(|a| a.ok), Some(true));
        let received = sink.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].secret, "s3cret");
        assert_eq!(received[0].sheet_id, "sheet-1");
        assert_eq!(received[0].resultats, outcome.merged);
        assert_eq!(received[0].ml, outcome.scaled);
        assert_eq!(outcome.merged.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_dry_run_skips_sink() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run_pipeline(request(dir.path()), None).await.unwrap();
        assert!(outcome.ack.is_none());
        assert_eq!(outcome.scaled.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_sink_failure_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FakeSink::failing("bad secret");

        let err = run_pipeline(request(dir.path()), Some(&sink)).await.unwrap_err();

        assert!(format!("{:#}", err).contains("bad secret"));
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_before_submit_never_calls_sink() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FakeSink::ok();

        let mut missing = request(dir.path());
        missing.extraction = dir.path().join("missing.xlsx");
        assert!(run_pipeline(missing, Some(&sink)).await.is_err());

        let mut bad_columns = request(dir.path());
        bad_columns.extraction_columns = ColumnRefs::from_list("A,B,D,C,AA").unwrap();
        assert!(run_pipeline(bad_columns, Some(&sink)).await.is_err());

        assert_eq!(sink.calls(), 0);
    }
}
