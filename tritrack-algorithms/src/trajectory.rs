//! Straight-line prediction of the middle-plane crossing from pixelized
//! outer-plane hits.

use tritrack_core::error::{Error, Result};
use tritrack_core::pixel::PixelGrid;
use tritrack_core::Vec3;

/// Smallest separation between the outer hits for which a line is defined (mm).
const MIN_BASELINE_MM: f64 = 1e-12;

/// Predicts the transverse position at `z2` of the line through the outer hits.
///
/// Each transverse coordinate of `p1` and `p3` is snapped to its pixel centre
/// before interpolating, since the detector only reports pixel positions.
/// `z1` and `z3` are the longitudinal positions of the two hits.
///
/// # Errors
/// Returns [`Error::DegenerateBaseline`] if `z1` and `z3` coincide.
pub fn predict_middle_plane(
    p1: Vec3,
    z1: f64,
    p3: Vec3,
    z3: f64,
    z2: f64,
    grid: &PixelGrid,
) -> Result<(f64, f64)> {
    let baseline = z3 - z1;
    if baseline.abs() < MIN_BASELINE_MM {
        return Err(Error::DegenerateBaseline { z: z1 });
    }

    let (x1, y1) = grid.snap_xy(p1.x, p1.y);
    let (x3, y3) = grid.snap_xy(p3.x, p3.y);

    let t = (z2 - z1) / baseline;
    Ok((x1 + (x3 - x1) * t, y1 + (y3 - y1) * t))
}
