//! Per-event, per-layer first-crossing store.

use crate::hit::{EventHits, EventId, LayerId, Vec3};
use std::collections::BTreeMap;

/// Records the first boundary-crossing position per (event, layer).
///
/// A recorded hit is never overwritten or dropped until [`EventHitStore::reset`].
/// Iteration is in ascending event ID.
#[derive(Debug, Clone, Default)]
pub struct EventHitStore {
    events: BTreeMap<EventId, EventHits>,
}

impl EventHitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pos` for (`event`, `layer`) unless a hit is already stored there.
    ///
    /// Returns true if the position was stored.
    pub fn record(&mut self, event: EventId, layer: LayerId, pos: Vec3) -> bool {
        self.events.entry(event).or_default().set_first(layer, pos)
    }

    /// Clears all recorded events.
    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Returns the hits recorded for `event`.
    #[must_use]
    pub fn get(&self, event: EventId) -> Option<&EventHits> {
        self.events.get(&event)
    }

    /// Number of events with at least one recorded hit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates events in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (EventId, &EventHits)> {
        self.events.iter().map(|(&id, hits)| (id, hits))
    }

    /// Folds a worker shard into this store.
    ///
    /// Slots already filled here win over the shard's.
    pub fn merge(&mut self, other: EventHitStore) {
        for (event, hits) in other.events {
            let slot = self.events.entry(event).or_default();
            for layer in LayerId::ALL {
                if let Some(pos) = hits.get(layer) {
                    slot.set_first(layer, pos);
                }
            }
        }
    }

    /// Merges worker shards in the given order.
    pub fn merge_shards<I>(shards: I) -> Self
    where
        I: IntoIterator<Item = EventHitStore>,
    {
        let mut merged = Self::new();
        for shard in shards {
            merged.merge(shard);
        }
        merged
    }
}
