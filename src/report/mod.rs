//! Report module - tables, charts and run summaries

pub mod plots;
pub mod summary;
pub mod tables;
pub mod validation_report;

pub use plots::*;
pub use summary::*;
pub use tables::*;
pub use validation_report::*;
