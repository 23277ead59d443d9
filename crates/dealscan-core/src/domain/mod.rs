//! # Domain Models
//!
//! Canonical types shared by every stage of a scan.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DealRecord`] | One disclosed block or bulk trade |
//! | [`SymbolUniverse`] | SME ticker set used as a filter predicate |
//! | [`DateRange`] | Closed calendar interval queried in a run |
//!
//! Every value is built once per run and never mutated afterwards. Numeric
//! and date fields of [`DealRecord`] stay as the source text; nothing here
//! performs arithmetic on them.

mod date_range;
mod deal;
mod universe;

pub use date_range::{dmy_dashed, iso_date, ymd_compact, DateRange};
pub use deal::DealRecord;
pub use universe::SymbolUniverse;
