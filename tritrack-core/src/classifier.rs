//! Classification of transport-engine boundary crossings into layer hits.

use crate::hit::{CrossingNotification, LayerId};
use crate::stack::{StackConfig, SubVolumeRole};
use crate::store::EventHitStore;
use std::collections::HashMap;

/// Lookup from physical-volume name to the layer and role it belongs to.
#[derive(Debug, Clone, Default)]
pub struct VolumeMap {
    volumes: HashMap<String, (LayerId, SubVolumeRole)>,
}

impl VolumeMap {
    /// Builds the map from the sub-volumes actually present in `stack`.
    #[must_use]
    pub fn from_stack(stack: &StackConfig) -> Self {
        let mut volumes = HashMap::new();
        for layer in LayerId::ALL {
            let fs = stack.layer(layer);
            for role in SubVolumeRole::ALL {
                if fs.has_volume(role) {
                    volumes.insert(role.volume_name(layer), (layer, role));
                }
            }
        }
        Self { volumes }
    }

    /// Looks up a volume name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(LayerId, SubVolumeRole)> {
        self.volumes.get(name).copied()
    }

    /// Number of mapped volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Returns true if no volumes are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

/// Outcome of classifying one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a primary geometric-boundary entry into a volume.
    Rejected,
    /// Entered a volume that does not belong to any layer.
    Unmatched,
    /// First entry into the layer; position stored.
    Recorded(LayerId, SubVolumeRole),
    /// Layer already had a hit for this event; position discarded.
    AlreadyHit(LayerId, SubVolumeRole),
}

/// Turns crossing notifications into first-crossing layer hits.
///
/// The primary travels top-down, so the first sub-volume it enters on a layer
/// is the topmost present film there; that entry is the layer's hit.
#[derive(Debug, Clone, Default)]
pub struct BoundaryClassifier {
    volumes: VolumeMap,
    total_edep_mev: f64,
}

impl BoundaryClassifier {
    /// Creates a classifier for the volumes of `stack`.
    #[must_use]
    pub fn new(stack: &StackConfig) -> Self {
        Self {
            volumes: VolumeMap::from_stack(stack),
            total_edep_mev: 0.0,
        }
    }

    /// Clears the run-scoped deposited energy.
    pub fn reset(&mut self) {
        self.total_edep_mev = 0.0;
    }

    /// Adds deposited energy to the run total.
    pub fn add_energy_deposit(&mut self, edep_mev: f64) {
        self.total_edep_mev += edep_mev;
    }

    /// Run-scoped deposited energy of accepted steps (MeV).
    #[must_use]
    pub fn total_edep_mev(&self) -> f64 {
        self.total_edep_mev
    }

    /// Classifies `notification` and records matched hits into `store`.
    pub fn classify(
        &mut self,
        notification: &CrossingNotification,
        store: &mut EventHitStore,
    ) -> Classification {
        if !notification.geometric_boundary
            || notification.parent_id != 0
            || notification.post_volume.is_empty()
        {
            return Classification::Rejected;
        }

        self.add_energy_deposit(notification.energy_deposit_mev);

        let Some((layer, role)) = self.volumes.lookup(&notification.post_volume) else {
            log::trace!(
                "[evt {}] ignoring crossing into {}",
                notification.event_id,
                notification.post_volume
            );
            return Classification::Unmatched;
        };

        let pos = notification.position;
        if store.record(notification.event_id, layer, pos) {
            log::debug!(
                "[evt {}] enter {} ({}) at ({:.6}, {:.6}, {:.6}) mm",
                notification.event_id,
                layer,
                role.tag(),
                pos.x,
                pos.y,
                pos.z
            );
            Classification::Recorded(layer, role)
        } else {
            Classification::AlreadyHit(layer, role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Vec3;

    fn classifier() -> BoundaryClassifier {
        BoundaryClassifier::new(&StackConfig::default())
    }

    #[test]
    fn test_volume_map_default_stack() {
        let map = VolumeMap::from_stack(&StackConfig::default());
        // Substrate, film, absorber, oxide on each layer; passivation disabled.
        assert_eq!(map.len(), 12);
        assert_eq!(
            map.lookup("Layer2_Al2O3_phys"),
            Some((LayerId::Layer2, SubVolumeRole::Oxide))
        );
        assert_eq!(map.lookup("Layer1_SiN_phys"), None);
        assert_eq!(map.lookup("Layer1_phys"), None);
    }

    #[test]
    fn test_first_entry_wins() {
        let mut c = classifier();
        let mut store = EventHitStore::new();

        let top = CrossingNotification::primary(0, "Layer3_Al2O3_phys", Vec3::new(1.0, 1.0, 11.0));
        let below = CrossingNotification::primary(0, "Layer3_Si_phys", Vec3::new(1.0, 1.0, 10.9));

        assert_eq!(
            c.classify(&top, &mut store),
            Classification::Recorded(LayerId::Layer3, SubVolumeRole::Oxide)
        );
        assert_eq!(
            c.classify(&below, &mut store),
            Classification::AlreadyHit(LayerId::Layer3, SubVolumeRole::Substrate)
        );
        assert_eq!(
            store.get(0).unwrap().get(LayerId::Layer3),
            Some(Vec3::new(1.0, 1.0, 11.0))
        );
    }

    #[test]
    fn test_rejects_secondaries_and_non_boundary_steps() {
        let mut c = classifier();
        let mut store = EventHitStore::new();

        let mut secondary = CrossingNotification::primary(1, "Layer1_Si_phys", Vec3::default());
        secondary.parent_id = 4;
        assert_eq!(c.classify(&secondary, &mut store), Classification::Rejected);

        let mut inside = CrossingNotification::primary(1, "Layer1_Si_phys", Vec3::default());
        inside.geometric_boundary = false;
        assert_eq!(c.classify(&inside, &mut store), Classification::Rejected);

        let left_world = CrossingNotification::primary(1, "", Vec3::default());
        assert_eq!(c.classify(&left_world, &mut store), Classification::Rejected);

        assert!(store.is_empty());
    }

    #[test]
    fn test_unmatched_volume_ignored() {
        let mut c = classifier();
        let mut store = EventHitStore::new();
        let n = CrossingNotification::primary(2, "World", Vec3::default());
        assert_eq!(c.classify(&n, &mut store), Classification::Unmatched);
        assert!(store.is_empty());
    }

    #[test]
    fn test_energy_accumulates_for_accepted_steps_only() {
        let mut c = classifier();
        let mut store = EventHitStore::new();

        let mut accepted = CrossingNotification::primary(0, "World", Vec3::default());
        accepted.energy_deposit_mev = 0.25;
        c.classify(&accepted, &mut store);

        let mut rejected = CrossingNotification::primary(0, "Layer1_Si_phys", Vec3::default());
        rejected.parent_id = 1;
        rejected.energy_deposit_mev = 10.0;
        c.classify(&rejected, &mut store);

        c.add_energy_deposit(0.5);
        assert!((c.total_edep_mev() - 0.75).abs() < 1e-12);

        c.reset();
        assert!(c.total_edep_mev().abs() < f64::EPSILON);
    }
}
