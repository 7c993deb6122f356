//! Per-layer film stacks, stack placement and beam configuration.
//!
//! Lengths are in millimetres. Each layer is a slab whose substrate sits at
//! the bottom with the thin films stacked upward on top of it in the order
//! full film, absorber strip, oxide, passivation.

use crate::hit::LayerId;
use crate::material::Material;
use serde::{Deserialize, Serialize};

/// A single film (or substrate) with an on/off toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmLayer {
    /// Whether the film is deposited at all.
    pub enabled: bool,
    /// Film thickness (mm).
    pub thickness_mm: f64,
    /// Film material.
    pub material: Material,
}

impl FilmLayer {
    /// Creates an enabled film.
    #[must_use]
    pub fn new(thickness_mm: f64, material: Material) -> Self {
        Self {
            enabled: true,
            thickness_mm,
            material,
        }
    }

    /// Creates a disabled film that keeps its nominal thickness.
    #[must_use]
    pub fn disabled(thickness_mm: f64, material: Material) -> Self {
        Self {
            enabled: false,
            thickness_mm,
            material,
        }
    }

    /// A film is physically present only when enabled with positive thickness.
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.enabled && self.thickness_mm > 0.0
    }

    /// Thickness contributed to the stack height (0 when absent).
    #[inline]
    #[must_use]
    pub fn effective_thickness(&self) -> f64 {
        if self.is_present() {
            self.thickness_mm
        } else {
            0.0
        }
    }

    /// Thickness in radiation lengths.
    #[inline]
    #[must_use]
    pub fn radiation_lengths(&self) -> f64 {
        self.thickness_mm / self.material.radiation_length_mm()
    }
}

/// Role of a sub-volume within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubVolumeRole {
    /// Patterned absorber strip.
    Absorber,
    /// Native oxide on the absorber.
    Oxide,
    /// Optional passivation over the absorber footprint.
    Passivation,
    /// Full-coverage superconducting film.
    Film,
    /// Substrate wafer.
    Substrate,
}

impl SubVolumeRole {
    /// All roles, in the order they are matched against volume names.
    pub const ALL: [SubVolumeRole; 5] = [
        SubVolumeRole::Absorber,
        SubVolumeRole::Oxide,
        SubVolumeRole::Passivation,
        SubVolumeRole::Film,
        SubVolumeRole::Substrate,
    ];

    /// Tag used in physical-volume names.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            SubVolumeRole::Absorber => "AlStrip",
            SubVolumeRole::Oxide => "Al2O3",
            SubVolumeRole::Passivation => "SiN",
            SubVolumeRole::Film => "NbTiN",
            SubVolumeRole::Substrate => "Si",
        }
    }

    /// Physical-volume name of this role on `layer`, e.g. `Layer2_AlStrip_phys`.
    #[must_use]
    pub fn volume_name(self, layer: LayerId) -> String {
        format!("{}_{}_phys", layer.label(), self.tag())
    }
}

/// Description of one detector layer, top-down on its substrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmStack {
    /// Square chip edge length (mm).
    pub chip_xy_mm: f64,
    /// Substrate wafer; always present.
    pub substrate: FilmLayer,
    /// Full-coverage superconducting film.
    pub film: FilmLayer,
    /// Patterned absorber strip.
    pub absorber: FilmLayer,
    /// Absorber strip width along x (mm).
    pub absorber_width_mm: f64,
    /// Absorber strip length along y (mm).
    pub absorber_length_mm: f64,
    /// Native oxide on the absorber (only deposited with the absorber).
    pub oxide: FilmLayer,
    /// Passivation over the absorber footprint, or the whole chip without one.
    pub passivation: FilmLayer,
}

impl Default for FilmStack {
    fn default() -> Self {
        Self {
            chip_xy_mm: 55.0,
            substrate: FilmLayer::new(0.35, Material::silicon()),
            film: FilmLayer::new(500e-6, Material::nbtin()),
            absorber: FilmLayer::new(40e-6, Material::aluminium()),
            absorber_width_mm: 0.05,
            absorber_length_mm: 1.2,
            oxide: FilmLayer::new(3e-6, Material::alumina()),
            passivation: FilmLayer::disabled(0.0, Material::silicon_nitride()),
        }
    }
}

impl FilmStack {
    /// Sets the substrate thickness.
    #[must_use]
    pub fn with_substrate_thickness(mut self, thickness_mm: f64) -> Self {
        self.substrate.thickness_mm = thickness_mm;
        self
    }

    /// Sets the absorber strip footprint (width along x, length along y).
    #[must_use]
    pub fn with_absorber_footprint(mut self, width_mm: f64, length_mm: f64) -> Self {
        self.absorber_width_mm = width_mm;
        self.absorber_length_mm = length_mm;
        self
    }

    /// Enables the passivation film with the given thickness.
    #[must_use]
    pub fn with_passivation(mut self, thickness_mm: f64) -> Self {
        self.passivation.enabled = true;
        self.passivation.thickness_mm = thickness_mm;
        self
    }

    /// Returns the film for `role`.
    #[must_use]
    pub fn layer(&self, role: SubVolumeRole) -> &FilmLayer {
        match role {
            SubVolumeRole::Absorber => &self.absorber,
            SubVolumeRole::Oxide => &self.oxide,
            SubVolumeRole::Passivation => &self.passivation,
            SubVolumeRole::Film => &self.film,
            SubVolumeRole::Substrate => &self.substrate,
        }
    }

    /// Returns true if the sub-volume for `role` is built into the layer.
    #[must_use]
    pub fn has_volume(&self, role: SubVolumeRole) -> bool {
        match role {
            SubVolumeRole::Substrate => true,
            SubVolumeRole::Oxide => self.absorber.is_present() && self.oxide.is_present(),
            other => self.layer(other).is_present(),
        }
    }

    /// Total thickness of present films above the substrate.
    #[must_use]
    pub fn films_thickness(&self) -> f64 {
        [
            SubVolumeRole::Film,
            SubVolumeRole::Absorber,
            SubVolumeRole::Oxide,
            SubVolumeRole::Passivation,
        ]
        .into_iter()
        .filter(|&role| self.has_volume(role))
        .map(|role| self.layer(role).thickness_mm)
        .sum()
    }

    /// Returns true if `(x, y)` lies within the absorber strip footprint.
    #[inline]
    #[must_use]
    pub fn in_absorber_footprint(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.absorber_width_mm * 0.5 && y.abs() <= self.absorber_length_mm * 0.5
    }
}

/// Nominal primary kinematics used by the scattering model.
///
/// Every track is treated as having this momentum, regardless of energy it
/// may have lost upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Momentum (MeV/c).
    pub momentum_mev: f64,
    /// Velocity as a fraction of c.
    pub beta: f64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            momentum_mev: 4000.0,
            beta: 1.0,
        }
    }
}

/// Longitudinal placement of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlacement {
    /// Centre of the layer slab.
    pub center_z: f64,
    /// Bottom face of the substrate.
    pub bottom_z: f64,
    /// Top face of the substrate.
    pub substrate_top_z: f64,
    /// Top of the topmost present film; the layer's entry surface.
    pub entry_z: f64,
}

/// The three-layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Layer descriptions in stack order.
    pub layers: [FilmStack; 3],
    /// Substrate-to-substrate distance Layer1 -> Layer2 (mm).
    pub gap12_mm: f64,
    /// Substrate-to-substrate distance Layer2 -> Layer3 (mm).
    pub gap23_mm: f64,
    /// Air margin added to each layer slab above its films (mm).
    pub mother_margin_mm: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            layers: [FilmStack::default(), FilmStack::default(), FilmStack::default()],
            gap12_mm: 5.0,
            gap23_mm: 5.0,
            mother_margin_mm: 0.01,
        }
    }
}

impl StackConfig {
    /// Builds a stack of three identical layers.
    #[must_use]
    pub fn uniform(layer: FilmStack, gap12_mm: f64, gap23_mm: f64) -> Self {
        Self {
            layers: [layer.clone(), layer.clone(), layer],
            gap12_mm,
            gap23_mm,
            ..Self::default()
        }
    }

    /// Returns the description of `layer`.
    #[inline]
    #[must_use]
    pub fn layer(&self, layer: LayerId) -> &FilmStack {
        &self.layers[layer.index()]
    }

    /// Centre z of each layer slab.
    #[must_use]
    pub fn centers(&self) -> [f64; 3] {
        let z1 = 0.0;
        let z2 = z1 + self.layers[0].substrate.thickness_mm + self.gap12_mm;
        let z3 = z2 + self.layers[1].substrate.thickness_mm + self.gap23_mm;
        [z1, z2, z3]
    }

    /// Longitudinal placement of `layer`.
    #[must_use]
    pub fn placement(&self, layer: LayerId) -> LayerPlacement {
        let fs = self.layer(layer);
        let center_z = self.centers()[layer.index()];
        let films = fs.films_thickness();
        let slab = fs.substrate.thickness_mm + films + self.mother_margin_mm;
        let bottom_z = center_z - slab * 0.5;
        let substrate_top_z = bottom_z + fs.substrate.thickness_mm;
        LayerPlacement {
            center_z,
            bottom_z,
            substrate_top_z,
            entry_z: substrate_top_z + films,
        }
    }
}
