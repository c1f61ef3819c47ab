//! Lenient cell coercion
//!
//! Both coercions are total: bad input degrades to `0` or `None` and never
//! aborts a run.

mod date;
mod number;

pub use date::coerce_date;
pub use number::{coerce_number, parse_number};
