//! Workbook I/O: decoding input sheets into grids and exporting result tables

mod reader;
mod writer;

pub use reader::read_grids;
pub use writer::write_tables_excel;
