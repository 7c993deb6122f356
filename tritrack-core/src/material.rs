//! Materials and their radiation lengths.
//!
//! Compounds use the mixture rule `1/X0 = sum(w_i / X0_i)` over element
//! mass fractions `w_i`. Element mass radiation lengths are PDG values.

use serde::{Deserialize, Serialize};

/// A chemical element with its mass radiation length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Chemical symbol.
    pub symbol: &'static str,
    /// Molar mass (g/mol).
    pub molar_mass: f64,
    /// Mass radiation length (g/cm^2).
    pub radiation_length_g_cm2: f64,
}

impl Element {
    pub const SILICON: Element = Element {
        symbol: "Si",
        molar_mass: 28.0855,
        radiation_length_g_cm2: 21.82,
    };
    pub const ALUMINIUM: Element = Element {
        symbol: "Al",
        molar_mass: 26.981_54,
        radiation_length_g_cm2: 24.01,
    };
    pub const NITROGEN: Element = Element {
        symbol: "N",
        molar_mass: 14.007,
        radiation_length_g_cm2: 37.99,
    };
    pub const OXYGEN: Element = Element {
        symbol: "O",
        molar_mass: 15.999,
        radiation_length_g_cm2: 34.24,
    };
    pub const TITANIUM: Element = Element {
        symbol: "Ti",
        molar_mass: 47.867,
        radiation_length_g_cm2: 16.16,
    };
    pub const NIOBIUM: Element = Element {
        symbol: "Nb",
        molar_mass: 92.906_38,
        radiation_length_g_cm2: 9.92,
    };
}

/// A bulk material described by density and mass radiation length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Density (g/cm^3).
    pub density_g_cm3: f64,
    /// Mass radiation length (g/cm^2).
    pub radiation_length_g_cm2: f64,
}

impl Material {
    /// Creates a material from a single element.
    #[must_use]
    pub fn element(name: &str, element: Element, density_g_cm3: f64) -> Self {
        Self {
            name: name.to_string(),
            density_g_cm3,
            radiation_length_g_cm2: element.radiation_length_g_cm2,
        }
    }

    /// Creates a compound from `(element, atom count)` pairs.
    #[must_use]
    pub fn compound(name: &str, density_g_cm3: f64, parts: &[(Element, u32)]) -> Self {
        let total_mass: f64 = parts
            .iter()
            .map(|(el, n)| el.molar_mass * f64::from(*n))
            .sum();
        let inverse: f64 = parts
            .iter()
            .map(|(el, n)| {
                let w = el.molar_mass * f64::from(*n) / total_mass;
                w / el.radiation_length_g_cm2
            })
            .sum();
        Self {
            name: name.to_string(),
            density_g_cm3,
            radiation_length_g_cm2: 1.0 / inverse,
        }
    }

    /// Radiation length in millimetres.
    #[inline]
    #[must_use]
    pub fn radiation_length_mm(&self) -> f64 {
        10.0 * self.radiation_length_g_cm2 / self.density_g_cm3
    }

    /// Crystalline silicon substrate.
    #[must_use]
    pub fn silicon() -> Self {
        Self::element("G4_Si", Element::SILICON, 2.33)
    }

    /// Aluminium absorber.
    #[must_use]
    pub fn aluminium() -> Self {
        Self::element("G4_Al", Element::ALUMINIUM, 2.699)
    }

    /// Stoichiometric NbTiN approximation of the superconducting film.
    #[must_use]
    pub fn nbtin() -> Self {
        Self::compound(
            "NbTiNApprox",
            8.4,
            &[
                (Element::NIOBIUM, 1),
                (Element::TITANIUM, 1),
                (Element::NITROGEN, 1),
            ],
        )
    }

    /// Silicon nitride passivation.
    #[must_use]
    pub fn silicon_nitride() -> Self {
        Self::compound(
            "Si3N4",
            3.17,
            &[(Element::SILICON, 3), (Element::NITROGEN, 4)],
        )
    }

    /// Native aluminium oxide.
    #[must_use]
    pub fn alumina() -> Self {
        Self::compound(
            "Al2O3_custom",
            3.95,
            &[(Element::ALUMINIUM, 2), (Element::OXYGEN, 3)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_silicon_radiation_length() {
        // ~9.37 cm
        assert_relative_eq!(Material::silicon().radiation_length_mm(), 93.65, epsilon = 0.1);
    }

    #[test]
    fn test_aluminium_radiation_length() {
        assert_relative_eq!(Material::aluminium().radiation_length_mm(), 88.96, epsilon = 0.1);
    }

    #[test]
    fn test_single_element_compound_matches_element() {
        let c = Material::compound("Si", 2.33, &[(Element::SILICON, 1)]);
        assert_relative_eq!(c.radiation_length_g_cm2, Element::SILICON.radiation_length_g_cm2);
    }

    #[test]
    fn test_compounds_between_constituents() {
        let ox = Material::alumina();
        assert!(ox.radiation_length_g_cm2 > Element::ALUMINIUM.radiation_length_g_cm2);
        assert!(ox.radiation_length_g_cm2 < Element::OXYGEN.radiation_length_g_cm2);
        assert_relative_eq!(ox.radiation_length_g_cm2, 27.94, epsilon = 0.05);

        let nb = Material::nbtin();
        assert_relative_eq!(nb.radiation_length_mm(), 14.5, epsilon = 0.1);
    }
}
