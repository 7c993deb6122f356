//! Material budget, in radiation lengths, traversed through one layer.

use crate::hit::Vec3;
use crate::stack::FilmStack;

/// Radiation-length budget for a hit on one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiationBudget {
    /// Traversed thickness in radiation lengths (always >= 0).
    pub t: f64,
    /// True if the hit lies within the absorber strip footprint.
    pub crosses_absorber: bool,
}

impl RadiationBudget {
    /// Computes the budget of `stack` at the raw (non-pixelized) `hit` position.
    ///
    /// The substrate and full-coverage film count everywhere. The absorber,
    /// its oxide and the passivation only count when the transverse hit
    /// position lies within the absorber strip footprint; without a strip
    /// none of them contribute.
    #[must_use]
    pub fn compute(stack: &FilmStack, hit: Vec3) -> Self {
        let mut t = stack.substrate.radiation_lengths().max(0.0);
        if stack.film.is_present() {
            t += stack.film.radiation_lengths();
        }

        let crosses_absorber =
            stack.absorber.is_present() && stack.in_absorber_footprint(hit.x, hit.y);
        if crosses_absorber {
            t += stack.absorber.radiation_lengths();
            if stack.oxide.is_present() {
                t += stack.oxide.radiation_lengths();
            }
            if stack.passivation.is_present() {
                t += stack.passivation.radiation_lengths();
            }
        }

        Self { t, crosses_absorber }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use approx::assert_relative_eq;

    fn inside() -> Vec3 {
        Vec3::new(0.01, 0.3, 0.0)
    }

    fn outside() -> Vec3 {
        Vec3::new(5.0, 5.0, 0.0)
    }

    #[test]
    fn test_outside_footprint_counts_substrate_and_film() {
        let fs = FilmStack::default();
        let expected = 0.35 / Material::silicon().radiation_length_mm()
            + 500e-6 / Material::nbtin().radiation_length_mm();
        let budget = RadiationBudget::compute(&fs, outside());
        assert_relative_eq!(budget.t, expected, epsilon = 1e-15);
        assert!(!budget.crosses_absorber);
    }

    #[test]
    fn test_inside_footprint_adds_absorber_and_oxide() {
        let fs = FilmStack::default();
        let out = RadiationBudget::compute(&fs, outside());
        let inn = RadiationBudget::compute(&fs, inside());
        let extra = 40e-6 / Material::aluminium().radiation_length_mm()
            + 3e-6 / Material::alumina().radiation_length_mm();
        assert!(inn.crosses_absorber);
        assert_relative_eq!(inn.t - out.t, extra, epsilon = 1e-15);
    }

    #[test]
    fn test_monotonic_in_film_thickness_inside_footprint() {
        let mut previous = 0.0;
        for k in 0..6 {
            let mut fs = FilmStack::default().with_passivation(f64::from(k) * 20e-6);
            fs.absorber.thickness_mm = 40e-6 + f64::from(k) * 10e-6;
            fs.oxide.thickness_mm = 3e-6 + f64::from(k) * 1e-6;
            fs.film.thickness_mm = 500e-6 + f64::from(k) * 50e-6;
            let t = RadiationBudget::compute(&fs, inside()).t;
            assert!(t >= previous);
            previous = t;
        }
    }

    #[test]
    fn test_patterned_films_ignored_outside_footprint() {
        let base = RadiationBudget::compute(&FilmStack::default(), outside()).t;
        let mut thick = FilmStack::default().with_passivation(1e-3);
        thick.absorber.thickness_mm = 1e-3;
        thick.oxide.thickness_mm = 1e-4;
        let t = RadiationBudget::compute(&thick, outside()).t;
        assert_relative_eq!(t, base, epsilon = 1e-15);
    }

    #[test]
    fn test_passivation_ignored_without_absorber() {
        let mut thin = FilmStack::default().with_passivation(1e-6);
        let mut thick = FilmStack::default().with_passivation(10e-3);
        thin.absorber.enabled = false;
        thick.absorber.enabled = false;

        let base = RadiationBudget::compute(&thin, outside());
        let budget = RadiationBudget::compute(&thick, outside());
        assert!(!budget.crosses_absorber);
        assert_relative_eq!(budget.t, base.t, epsilon = 1e-15);

        let on_axis = RadiationBudget::compute(&thick, inside());
        assert_relative_eq!(on_axis.t, base.t, epsilon = 1e-15);
    }

    #[test]
    fn test_passivation_counts_on_strip() {
        let fs = FilmStack::default().with_passivation(100e-6);
        let without = RadiationBudget::compute(&FilmStack::default(), inside()).t;
        let with = RadiationBudget::compute(&fs, inside()).t;
        assert_relative_eq!(
            with - without,
            100e-6 / Material::silicon_nitride().radiation_length_mm(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_disabled_absorber_never_crosses() {
        let mut fs = FilmStack::default();
        fs.absorber.enabled = false;
        let budget = RadiationBudget::compute(&fs, inside());
        assert!(!budget.crosses_absorber);
        assert!(budget.t > 0.0);
    }
}
