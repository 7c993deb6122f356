//! tritrack-core: Core types for three-plane track prediction.
//!
//! This crate provides the hit store, the layered stack geometry and
//! materials, the readout pixel grid, and the radiation-length and
//! multiple-scattering models used to predict where a primary crosses a
//! hidden middle plane.
//!

pub mod classifier;
pub mod config;
pub mod error;
pub mod hit;
pub mod material;
pub mod observer;
pub mod pixel;
pub mod radiation;
pub mod scattering;
pub mod stack;
pub mod store;

pub use classifier::{BoundaryClassifier, Classification, VolumeMap};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use hit::{CrossingNotification, EventHits, EventId, LayerId, Vec3};
pub use material::{Element, Material};
pub use observer::{RunSummary, TransportObserver};
pub use pixel::{PixelGrid, PixelIndex};
pub use radiation::RadiationBudget;
pub use scattering::highland_theta0;
pub use stack::{BeamConfig, FilmLayer, FilmStack, LayerPlacement, StackConfig, SubVolumeRole};
pub use store::EventHitStore;
