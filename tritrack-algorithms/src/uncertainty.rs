//! Positional uncertainty at the middle plane from multiple scattering.

/// Containment probability of the reported radius.
pub const CONTAINMENT: f64 = 0.95;

/// Ratio `r95 / sigma` for an isotropic 2D Gaussian (Rayleigh 95th percentile).
#[must_use]
pub fn containment_factor() -> f64 {
    (-2.0 * (1.0 - CONTAINMENT).ln()).sqrt()
}

/// Scattering-induced spread of the predicted crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringUncertainty {
    /// Projected sigma along x.
    pub sigma_x: f64,
    /// Projected sigma along y.
    pub sigma_y: f64,
    /// Combined radial sigma.
    pub sigma_r: f64,
    /// Radius containing 95% of crossings.
    pub r95: f64,
}

impl ScatteringUncertainty {
    /// Propagates `theta0` (rad) over `lever_arm` (mm).
    ///
    /// The projected angle is taken as isotropic, so both axes share the
    /// same sigma.
    #[must_use]
    pub fn compute(theta0: f64, lever_arm: f64) -> Self {
        let sigma = lever_arm * theta0;
        Self {
            sigma_x: sigma,
            sigma_y: sigma,
            sigma_r: std::f64::consts::SQRT_2 * sigma,
            r95: sigma * containment_factor(),
        }
    }

    /// The same spread expressed in pixels of the given pitch.
    #[must_use]
    pub fn in_pixels(&self, pitch: f64) -> Self {
        Self {
            sigma_x: self.sigma_x / pitch,
            sigma_y: self.sigma_y / pitch,
            sigma_r: self.sigma_r / pitch,
            r95: self.r95 / pitch,
        }
    }
}
