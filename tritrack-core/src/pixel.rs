//! Uniform pixel grid over the chip.
//!
//! Chip coordinates are centred on the chip (origin at the chip centre).
//! Pixel indices count from the lower-left corner, so they are computed on
//! coordinates shifted by half the extent.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pixel index pair `(column, row)`.
pub type PixelIndex = (u32, u32);

/// Relative tolerance for treating a coordinate as sitting on a bin edge.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Floor of `coord / pitch`, treating values within rounding error of a bin
/// edge as lying on it (27.5 / 0.275 must give bin 100, not 99).
#[inline]
fn bin(coord: f64, pitch: f64) -> f64 {
    let q = coord / pitch;
    let nearest = q.round();
    if (q - nearest).abs() <= EDGE_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        q.floor()
    }
}

/// Snaps `coord` to the centre of the pitch-sized bin containing it.
///
/// Bins are aligned to zero of the coordinate passed in.
#[inline]
#[must_use]
pub fn snap(coord: f64, pitch: f64) -> f64 {
    (bin(coord, pitch) + 0.5) * pitch
}

/// Bin index of an origin-offset coordinate, clamped to `[0, n - 1]`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn index(offset_coord: f64, pitch: f64, n: u32) -> u32 {
    bin(offset_coord, pitch).clamp(0.0, f64::from(n.saturating_sub(1))) as u32
}

/// Grid descriptor: physical extent and division count per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSpec", into = "GridSpec")]
pub struct PixelGrid {
    extent_x_mm: f64,
    extent_y_mm: f64,
    nx: u32,
    ny: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct GridSpec {
    extent_x_mm: f64,
    extent_y_mm: f64,
    nx: u32,
    ny: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            extent_x_mm: 55.0,
            extent_y_mm: 55.0,
            nx: 200,
            ny: 200,
        }
    }
}

impl TryFrom<GridSpec> for PixelGrid {
    type Error = Error;

    fn try_from(spec: GridSpec) -> Result<Self> {
        PixelGrid::new(spec.extent_x_mm, spec.extent_y_mm, spec.nx, spec.ny)
    }
}

impl From<PixelGrid> for GridSpec {
    fn from(grid: PixelGrid) -> Self {
        Self {
            extent_x_mm: grid.extent_x_mm,
            extent_y_mm: grid.extent_y_mm,
            nx: grid.nx,
            ny: grid.ny,
        }
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::square(55.0, 200)
    }
}

impl PixelGrid {
    /// Creates a grid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGrid`] if an extent is not positive or a
    /// division count is zero.
    pub fn new(extent_x_mm: f64, extent_y_mm: f64, nx: u32, ny: u32) -> Result<Self> {
        if !(extent_x_mm > 0.0 && extent_y_mm > 0.0) {
            return Err(Error::InvalidGrid(format!(
                "extent must be positive, got {extent_x_mm} x {extent_y_mm} mm"
            )));
        }
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidGrid(format!(
                "division count must be non-zero, got {nx} x {ny}"
            )));
        }
        Ok(Self {
            extent_x_mm,
            extent_y_mm,
            nx,
            ny,
        })
    }

    /// Square grid with `n` divisions per axis over an `extent_mm` chip.
    ///
    /// Falls back to a single pixel per axis for a zero `n`.
    #[must_use]
    pub fn square(extent_mm: f64, n: u32) -> Self {
        let n = n.max(1);
        Self {
            extent_x_mm: extent_mm,
            extent_y_mm: extent_mm,
            nx: n,
            ny: n,
        }
    }

    /// Divisions along x.
    #[must_use]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Divisions along y.
    #[must_use]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Extent along x (mm).
    #[must_use]
    pub fn extent_x(&self) -> f64 {
        self.extent_x_mm
    }

    /// Extent along y (mm).
    #[must_use]
    pub fn extent_y(&self) -> f64 {
        self.extent_y_mm
    }

    /// Pixel pitch along x (mm).
    #[inline]
    #[must_use]
    pub fn pitch_x(&self) -> f64 {
        self.extent_x_mm / f64::from(self.nx)
    }

    /// Pixel pitch along y (mm).
    #[inline]
    #[must_use]
    pub fn pitch_y(&self) -> f64 {
        self.extent_y_mm / f64::from(self.ny)
    }

    /// Snaps a centred chip position to its pixel centre.
    #[inline]
    #[must_use]
    pub fn snap_xy(&self, x: f64, y: f64) -> (f64, f64) {
        (snap(x, self.pitch_x()), snap(y, self.pitch_y()))
    }

    /// Pixel containing a centred chip position, clamped to the grid.
    #[must_use]
    pub fn pixel_of(&self, x: f64, y: f64) -> PixelIndex {
        (
            index(x + 0.5 * self.extent_x_mm, self.pitch_x(), self.nx),
            index(y + 0.5 * self.extent_y_mm, self.pitch_y(), self.ny),
        )
    }

    /// Centre of pixel `(i, j)` in centred chip coordinates.
    #[must_use]
    pub fn center_of(&self, (i, j): PixelIndex) -> (f64, f64) {
        (
            (f64::from(i) + 0.5) * self.pitch_x() - 0.5 * self.extent_x_mm,
            (f64::from(j) + 0.5) * self.pitch_y() - 0.5 * self.extent_y_mm,
        )
    }
}
