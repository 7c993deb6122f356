//! Interface a transport engine drives during a run.

use crate::hit::CrossingNotification;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Events with at least one recorded layer hit.
    pub events_recorded: usize,
    /// Events written to the reports (both outer planes hit).
    pub events_reported: usize,
    /// Reported events that also crossed the middle plane.
    pub events_with_middle_hit: usize,
    /// Run-scoped deposited energy (MeV).
    pub total_edep_mev: f64,
}

/// Callbacks issued by an external transport engine, in order:
/// `on_run_begin`, any number of crossings and deposits, `on_run_end`.
///
/// Calls are assumed serial. Engines processing events on several workers
/// should give each worker its own observer and merge the hit stores before
/// ending the run.
pub trait TransportObserver {
    /// Error returned when the run cannot be finalized.
    type Error;

    /// Resets all run state.
    fn on_run_begin(&mut self);

    /// Handles one boundary-crossing notification.
    fn on_boundary_crossing(&mut self, notification: &CrossingNotification);

    /// Accumulates energy deposited outside of crossing notifications (MeV).
    fn add_energy_deposit(&mut self, edep_mev: f64);

    /// Finalizes the run and emits its reports.
    ///
    /// # Errors
    /// Returns an error if the reports cannot be written.
    fn on_run_end(&mut self) -> Result<RunSummary, Self::Error>;
}
