//! Analysis configuration: stack geometry, beam and pixel grid.
//!
//! Built once and passed by reference to every component. JSON files may
//! omit any field; omitted fields take the default stack values.

use crate::error::{Error, Result};
use crate::hit::LayerId;
use crate::pixel::PixelGrid;
use crate::stack::{BeamConfig, StackConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Everything the run-end analysis needs besides the recorded hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Three-layer stack geometry.
    pub stack: StackConfig,
    /// Nominal beam kinematics for the scattering model.
    pub beam: BeamConfig,
    /// Readout pixel grid.
    pub grid: PixelGrid,
}

impl AnalysisConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stack geometry.
    #[must_use]
    pub fn with_stack(mut self, stack: StackConfig) -> Self {
        self.stack = stack;
        self
    }

    /// Sets the beam kinematics.
    #[must_use]
    pub fn with_beam(mut self, momentum_mev: f64, beta: f64) -> Self {
        self.beam = BeamConfig { momentum_mev, beta };
        self
    }

    /// Sets the pixel grid.
    #[must_use]
    pub fn with_grid(mut self, grid: PixelGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or fails
    /// [`AnalysisConfig::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks physical consistency.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.beam.momentum_mev) {
            return Err(Error::ConfigError(format!(
                "beam momentum must be positive, got {} MeV",
                self.beam.momentum_mev
            )));
        }
        if !(is_positive(self.beam.beta) && self.beam.beta <= 1.0) {
            return Err(Error::ConfigError(format!(
                "beam beta must be in (0, 1], got {}",
                self.beam.beta
            )));
        }
        if !(is_non_negative(self.stack.gap12_mm) && is_non_negative(self.stack.gap23_mm)) {
            return Err(Error::ConfigError(format!(
                "layer gaps must be non-negative, got {} and {} mm",
                self.stack.gap12_mm, self.stack.gap23_mm
            )));
        }
        for layer in LayerId::ALL {
            let fs = self.stack.layer(layer);
            if !is_positive(fs.chip_xy_mm) {
                return Err(Error::ConfigError(format!(
                    "{layer}: chip size must be positive"
                )));
            }
            if !is_positive(fs.substrate.thickness_mm) {
                return Err(Error::ConfigError(format!(
                    "{layer}: substrate thickness must be positive"
                )));
            }
            let films = [&fs.substrate, &fs.film, &fs.absorber, &fs.oxide, &fs.passivation];
            for film in films {
                if !is_non_negative(film.thickness_mm) {
                    return Err(Error::ConfigError(format!(
                        "{layer}: {} thickness is negative",
                        film.material.name
                    )));
                }
                if !(is_positive(film.material.density_g_cm3)
                    && is_positive(film.material.radiation_length_g_cm2))
                {
                    return Err(Error::ConfigError(format!(
                        "{layer}: material {} needs positive density and radiation length",
                        film.material.name
                    )));
                }
            }
            if !(is_non_negative(fs.absorber_width_mm)
                && is_non_negative(fs.absorber_length_mm))
            {
                return Err(Error::ConfigError(format!(
                    "{layer}: absorber footprint must be non-negative"
                )));
            }
        }
        Ok(())
    }
}

/// False for NaN.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// False for NaN.
fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
