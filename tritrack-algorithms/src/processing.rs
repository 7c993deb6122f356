//! Run-end analysis: turns recorded layer hits into report rows.

use crate::trajectory::predict_middle_plane;
use crate::uncertainty::ScatteringUncertainty;
use rayon::prelude::*;
use tritrack_core::error::Result;
use tritrack_core::{
    highland_theta0, AnalysisConfig, EventHitStore, EventHits, EventId, LayerId, PixelIndex,
    RadiationBudget, Vec3,
};

/// A position together with the pixel containing it and that pixel's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelizedPoint {
    /// Position (mm).
    pub position: Vec3,
    /// Pixel containing the transverse position.
    pub pixel: PixelIndex,
    /// Centre of that pixel in chip coordinates (mm).
    pub center: (f64, f64),
}

/// Geometry and prediction of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeflectionRow {
    /// Event identifier.
    pub event_id: EventId,
    /// Layer1 hit.
    pub l1: PixelizedPoint,
    /// Layer3 hit.
    pub l3: PixelizedPoint,
    /// Predicted middle-plane crossing, at the Layer2 entry surface.
    pub predicted: PixelizedPoint,
    /// Actual Layer2 hit; the origin stands in when there was none.
    pub actual: PixelizedPoint,
    /// Whether Layer2 was actually crossed.
    pub has_actual: bool,
    /// Transverse distance between prediction and actual hit.
    pub error_mm: Option<f64>,
}

/// Scattering uncertainty of one event's prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyRow {
    /// Event identifier.
    pub event_id: EventId,
    /// Centre of the predicted pixel (mm).
    pub predicted_center: (f64, f64),
    /// Predicted pixel.
    pub predicted_pixel: PixelIndex,
    /// Spread in millimetres.
    pub sigma_mm: ScatteringUncertainty,
    /// Spread in pixels.
    pub sigma_px: ScatteringUncertainty,
    /// Radiation-length budget through Layer1.
    pub radiation_lengths: f64,
    /// Whether the Layer1 hit lies within the absorber footprint.
    pub crosses_absorber: bool,
}

/// Both report rows of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventReport {
    /// Row of the geometry/prediction table.
    pub deflection: DeflectionRow,
    /// Row of the uncertainty table.
    pub uncertainty: UncertaintyRow,
}

/// Per-run quantities derived once from the configuration.
#[derive(Debug, Clone)]
pub struct EventAnalyzer<'a> {
    config: &'a AnalysisConfig,
    middle_entry_z: f64,
}

impl<'a> EventAnalyzer<'a> {
    /// Prepares the analysis for `config`.
    #[must_use]
    pub fn new(config: &'a AnalysisConfig) -> Self {
        let middle_entry_z = config.stack.placement(LayerId::Layer2).entry_z;
        Self {
            config,
            middle_entry_z,
        }
    }

    /// z of the middle plane's entry surface.
    #[must_use]
    pub fn middle_entry_z(&self) -> f64 {
        self.middle_entry_z
    }

    fn pixelize(&self, position: Vec3) -> PixelizedPoint {
        let grid = &self.config.grid;
        let pixel = grid.pixel_of(position.x, position.y);
        PixelizedPoint {
            position,
            pixel,
            center: grid.center_of(pixel),
        }
    }

    /// Analyzes one event.
    ///
    /// Returns `Ok(None)` when the event lacks a Layer1 or Layer3 hit.
    ///
    /// # Errors
    /// Returns an error if the outer hits share the same z.
    pub fn analyze(&self, event_id: EventId, hits: &EventHits) -> Result<Option<EventReport>> {
        let (Some(p1), Some(p3)) = (hits.get(LayerId::Layer1), hits.get(LayerId::Layer3)) else {
            return Ok(None);
        };
        let grid = &self.config.grid;
        let z2 = self.middle_entry_z;

        // Recorded hit z is the actual entry surface of each outer layer.
        let (px, py) = predict_middle_plane(p1, p1.z, p3, p3.z, z2, grid)?;
        let predicted = self.pixelize(Vec3::new(px, py, z2));

        // Footprint test on the raw Layer1 position, unlike the prediction.
        let budget = RadiationBudget::compute(self.config.stack.layer(LayerId::Layer1), p1);
        let beam = &self.config.beam;
        let theta0 = highland_theta0(beam.momentum_mev, beam.beta, budget.t);
        let lever_arm = (z2 - p1.z).abs();
        let sigma_mm = ScatteringUncertainty::compute(theta0, lever_arm);
        let sigma_px = sigma_mm.in_pixels(grid.pitch_x());

        let actual_hit = hits.get(LayerId::Layer2);
        let actual = self.pixelize(actual_hit.unwrap_or_default());
        let error_mm = actual_hit.map(|a| (px - a.x).hypot(py - a.y));

        Ok(Some(EventReport {
            deflection: DeflectionRow {
                event_id,
                l1: self.pixelize(p1),
                l3: self.pixelize(p3),
                predicted,
                actual,
                has_actual: hits.has(LayerId::Layer2),
                error_mm,
            },
            uncertainty: UncertaintyRow {
                event_id,
                predicted_center: predicted.center,
                predicted_pixel: predicted.pixel,
                sigma_mm,
                sigma_px,
                radiation_lengths: budget.t,
                crosses_absorber: budget.crosses_absorber,
            },
        }))
    }
}

/// Analyzes every event in `store` in parallel, in ascending event order.
///
/// Events lacking an outer-plane hit are left out. Events whose outer hits
/// cannot define a line are skipped with a warning.
#[must_use]
pub fn analyze_store(store: &EventHitStore, config: &AnalysisConfig) -> Vec<EventReport> {
    let analyzer = EventAnalyzer::new(config);
    let events: Vec<(EventId, &EventHits)> = store.iter().collect();

    events
        .par_iter()
        .filter_map(|&(event_id, hits)| match analyzer.analyze(event_id, hits) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("[evt {event_id}] skipped: {e}");
                None
            }
        })
        .collect()
}
