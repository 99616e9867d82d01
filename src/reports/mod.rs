//! CSV report generation
//!
//! Each resource kind has a fixed header and a projection function that turns one collected
//! record into one line. Lines are handed to [`CsvSink`], which owns the output files for a run.
//!
//! # Implementation Model
//!
//! - [`projector`] holds the per-kind projections. They are pure: the same record, context and
//!   calendar settings always produce the same line.
//! - [`CalendarSettings`] pins the time zone and week-numbering rule used for the calendar
//!   columns, so reports do not depend on the machine that produced them.
//! - [`Row`] joins fields, escaping each one per RFC 4180.
//! - [`CsvSink`] writes the header the first time a file is touched during a run and appends on
//!   every later write, so several projects can share one `multi-*.csv` file.

mod calendar;
pub mod projector;
mod resource_kind;
mod row;
mod sink;

pub use calendar::{CalendarFields, CalendarSettings, ReportZone, WeekRule};
pub use projector::ProjectionContext;
pub use resource_kind::ResourceKind;
pub use row::{Row, escape_csv};
pub use sink::{CsvSink, write_batch};
