//! Hit types for boundary crossings on the three detector planes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event identifier assigned by the transport engine.
pub type EventId = i64;

/// Position in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
    /// Z coordinate (mm), along the stack axis.
    pub z: f64,
}

impl Vec3 {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// One of the three planes of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerId {
    /// First (reference) plane.
    Layer1,
    /// Hidden middle plane.
    Layer2,
    /// Third (reference) plane.
    Layer3,
}

impl LayerId {
    /// All layers in stack order.
    pub const ALL: [LayerId; 3] = [LayerId::Layer1, LayerId::Layer2, LayerId::Layer3];

    /// Zero-based index into per-layer arrays.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            LayerId::Layer1 => 0,
            LayerId::Layer2 => 1,
            LayerId::Layer3 => 2,
        }
    }

    /// Volume-name label of the layer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LayerId::Layer1 => "Layer1",
            LayerId::Layer2 => "Layer2",
            LayerId::Layer3 => "Layer3",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A boundary-crossing notification as emitted by the transport engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingNotification {
    /// Event the step belongs to.
    pub event_id: EventId,
    /// Volume the step started in (empty if outside the world).
    #[serde(default)]
    pub pre_volume: String,
    /// Volume the step ended in (empty if the track left the world).
    #[serde(default)]
    pub post_volume: String,
    /// True when the step was limited by a geometric boundary.
    pub geometric_boundary: bool,
    /// Parent track ID; 0 for the primary.
    pub parent_id: i32,
    /// Post-step position (mm).
    pub position: Vec3,
    /// Energy deposited during the step (MeV).
    #[serde(default)]
    pub energy_deposit_mev: f64,
}

impl CrossingNotification {
    /// Creates a primary-track boundary crossing into `post_volume`.
    #[must_use]
    pub fn primary(event_id: EventId, post_volume: impl Into<String>, position: Vec3) -> Self {
        Self {
            event_id,
            pre_volume: String::new(),
            post_volume: post_volume.into(),
            geometric_boundary: true,
            parent_id: 0,
            position,
            energy_deposit_mev: 0.0,
        }
    }
}

/// First-crossing positions of one event on each of the three layers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventHits {
    slots: [Option<Vec3>; 3],
}

impl EventHits {
    /// Returns the recorded position on `layer`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, layer: LayerId) -> Option<Vec3> {
        self.slots[layer.index()]
    }

    /// Returns true if `layer` already holds a hit.
    #[inline]
    #[must_use]
    pub fn has(&self, layer: LayerId) -> bool {
        self.slots[layer.index()].is_some()
    }

    /// Stores `pos` on `layer` unless a hit is already there.
    ///
    /// Returns true if the position was stored.
    pub fn set_first(&mut self, layer: LayerId, pos: Vec3) -> bool {
        let slot = &mut self.slots[layer.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(pos);
        true
    }
}
