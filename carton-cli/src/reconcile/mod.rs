//! Tabular reconciliation of tracking and extraction workbooks
//!
//! Raw grid -> cleaned grid -> records -> per-day table (one per source)
//! -> merged table -> scaled table.

pub mod aggregate;
pub mod clean;
pub mod coerce;
pub mod extract;
pub mod merge;
pub mod scale;
pub mod types;

pub use aggregate::aggregate_with_stats;
pub use clean::clean_grid;
pub use extract::extract_records;
pub use merge::merge_tables;
pub use scale::scale_table;
pub use types::*;
