//! tritrack-io: Run session, notification replay and report output.
//!
//! This crate connects the analysis to the outside world: it receives the
//! transport engine's callbacks, replays recorded notification streams, and
//! writes the per-event CSV reports at the end of a run.
//!

mod error;
mod reader;
pub mod session;
mod writer;

pub use error::{Error, Result};
pub use reader::NotificationReader;
pub use session::{replay, ReportFiles, ReportSink, RunSession};
pub use writer::{
    ReportTable, ReportWriter, DEFLECTION_HEADER, MISSING_ERROR_MM, UNCERTAINTY_HEADER,
};
