//! Core types for the reconciliation pipeline

mod cell;
mod grid;
mod mapping;
mod table;

pub use cell::*;
pub use grid::*;
pub use mapping::*;
pub use table::*;
