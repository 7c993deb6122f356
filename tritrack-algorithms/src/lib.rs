//! tritrack-algorithms: Middle-plane prediction and its uncertainty.
//!
//! This crate provides:
//! - **Trajectory prediction** - straight line through pixelized outer hits
//! - **Uncertainty estimation** - Highland angle propagated over the lever arm
//! - **Run-end processing** - per-event report rows, evaluated in parallel
//!
#![warn(missing_docs)]

mod processing;
mod trajectory;
mod uncertainty;

pub use processing::{
    analyze_store, DeflectionRow, EventAnalyzer, EventReport, PixelizedPoint, UncertaintyRow,
};
pub use trajectory::predict_middle_plane;
pub use uncertainty::{containment_factor, ScatteringUncertainty, CONTAINMENT};

// Re-export core configuration for convenience
pub use tritrack_core::{AnalysisConfig, EventHitStore};
