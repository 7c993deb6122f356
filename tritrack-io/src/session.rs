//! Run session driven by an external transport engine.
//!
//! A [`RunSession`] receives run-begin, boundary-crossing and run-end
//! callbacks. Report writers are only opened inside `on_run_end`, and are
//! flushed and dropped before it returns.

use crate::writer::{ReportTable, ReportWriter};
use crate::{Error, NotificationReader, Result};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tritrack_algorithms::analyze_store;
use tritrack_core::{
    AnalysisConfig, BoundaryClassifier, CrossingNotification, EventHitStore, RunSummary,
    TransportObserver,
};

/// Destination of the two report tables.
pub trait ReportSink {
    /// Writer for one table.
    type Writer: Write;

    /// Opens `table` for writing, discarding any previous contents.
    ///
    /// # Errors
    /// Returns an error if the destination cannot be opened.
    fn open(&mut self, table: ReportTable) -> Result<Self::Writer>;
}

/// File-backed report destination.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    deflection: PathBuf,
    uncertainty: PathBuf,
}

impl ReportFiles {
    /// Default file name of the geometry/prediction table.
    pub const DEFLECTION_FILE: &'static str = "deflection_results.csv";
    /// Default file name of the uncertainty table.
    pub const UNCERTAINTY_FILE: &'static str = "l2_uncertainty.csv";

    /// Uses explicit paths for both tables.
    pub fn new(deflection: impl Into<PathBuf>, uncertainty: impl Into<PathBuf>) -> Self {
        Self {
            deflection: deflection.into(),
            uncertainty: uncertainty.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(Self::DEFLECTION_FILE),
            dir.join(Self::UNCERTAINTY_FILE),
        )
    }

    /// Path of `table`.
    #[must_use]
    pub fn path(&self, table: ReportTable) -> &Path {
        match table {
            ReportTable::Deflection => &self.deflection,
            ReportTable::Uncertainty => &self.uncertainty,
        }
    }
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self::new(Self::DEFLECTION_FILE, Self::UNCERTAINTY_FILE)
    }
}

impl ReportSink for ReportFiles {
    type Writer = BufWriter<File>;

    fn open(&mut self, table: ReportTable) -> Result<Self::Writer> {
        let file = File::create(self.path(table))?;
        Ok(BufWriter::new(file))
    }
}

/// Collects layer hits during a run and writes both reports at its end.
pub struct RunSession<S: ReportSink> {
    config: AnalysisConfig,
    classifier: BoundaryClassifier,
    store: EventHitStore,
    sink: S,
}

impl<S: ReportSink> RunSession<S> {
    /// Creates a session for `config` writing to `sink`.
    pub fn new(config: AnalysisConfig, sink: S) -> Self {
        let classifier = BoundaryClassifier::new(&config.stack);
        Self {
            config,
            classifier,
            store: EventHitStore::new(),
            sink,
        }
    }

    /// Hits recorded so far.
    pub fn store(&self) -> &EventHitStore {
        &self.store
    }

    /// Run-scoped deposited energy so far (MeV).
    pub fn total_edep_mev(&self) -> f64 {
        self.classifier.total_edep_mev()
    }

    /// Merges hits collected by a worker into this session's store.
    pub fn merge_shard(&mut self, shard: EventHitStore) {
        self.store.merge(shard);
    }
}

impl<S: ReportSink> TransportObserver for RunSession<S> {
    type Error = Error;

    fn on_run_begin(&mut self) {
        self.store.reset();
        self.classifier.reset();
        log::info!("run started");
    }

    fn on_boundary_crossing(&mut self, notification: &CrossingNotification) {
        self.classifier.classify(notification, &mut self.store);
    }

    fn add_energy_deposit(&mut self, edep_mev: f64) {
        self.classifier.add_energy_deposit(edep_mev);
    }

    fn on_run_end(&mut self) -> Result<RunSummary> {
        log::info!(
            "run ended: {} events recorded, total energy deposited {:.6} MeV",
            self.store.len(),
            self.classifier.total_edep_mev()
        );

        let reports = analyze_store(&self.store, &self.config);

        let deflection = self.sink.open(ReportTable::Deflection)?;
        let uncertainty = self.sink.open(ReportTable::Uncertainty)?;
        let mut writer = ReportWriter::new(deflection, uncertainty)?;
        writer.write_all(&reports)?;
        let rows = writer.rows();
        writer.finish()?;

        let summary = RunSummary {
            events_recorded: self.store.len(),
            events_reported: rows,
            events_with_middle_hit: reports.iter().filter(|r| r.deflection.has_actual).count(),
            total_edep_mev: self.classifier.total_edep_mev(),
        };
        log::info!(
            "wrote reports for {} of {} events ({} with a middle-plane hit)",
            summary.events_reported,
            summary.events_recorded,
            summary.events_with_middle_hit
        );
        Ok(summary)
    }
}

/// Drives `observer` through one run fed from a notification stream.
///
/// # Errors
/// Returns the first malformed-record error, or the run-end error. On a
/// malformed record the run is still ended so events read so far get reported.
pub fn replay<O, R>(observer: &mut O, notifications: NotificationReader<R>) -> Result<RunSummary>
where
    O: TransportObserver<Error = Error>,
    R: BufRead,
{
    observer.on_run_begin();
    let mut failure = None;
    for notification in notifications {
        match notification {
            Ok(n) => observer.on_boundary_crossing(&n),
            Err(e) => {
                log::warn!("stopping replay: {e}");
                failure = Some(e);
                break;
            }
        }
    }
    let summary = observer.on_run_end()?;
    match failure {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}
