//! Highland approximation of the multiple-scattering angle.

/// Smallest radiation-length budget used, keeping `ln(t)` finite.
pub const MIN_RADIATION_LENGTHS: f64 = 1e-12;

/// Highland constant (MeV).
const HIGHLAND_SCALE_MEV: f64 = 13.6;

/// RMS plane-projected scattering angle (rad) after `t` radiation lengths.
///
/// `momentum_mev` is the momentum in MeV/c and `beta` the velocity as a
/// fraction of c. The parametrization is accurate for `t` roughly within
/// `[1e-3, 100]`; smaller budgets are still evaluated but less reliable.
#[must_use]
pub fn highland_theta0(momentum_mev: f64, beta: f64, t: f64) -> f64 {
    let t = t.max(MIN_RADIATION_LENGTHS);
    HIGHLAND_SCALE_MEV / (momentum_mev * beta) * t.sqrt() * (1.0 + 0.038 * t.ln())
}
