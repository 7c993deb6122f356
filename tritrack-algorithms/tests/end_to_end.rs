#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
use approx::assert_relative_eq;
use tritrack_algorithms::{analyze_store, EventAnalyzer};
use tritrack_core::{
    highland_theta0, AnalysisConfig, EventHitStore, FilmStack, LayerId, Material, PixelGrid,
    StackConfig, Vec3,
};

/// 55 mm chips with 0.35 mm Si, 500 nm film, 40 nm x 1.2 mm x 50 um strip and
/// 3 nm oxide on every layer; 5 mm gaps; 4 GeV/c muons at beta = 1.
fn reference_config() -> AnalysisConfig {
    let layer = FilmStack::default()
        .with_substrate_thickness(0.35)
        .with_absorber_footprint(0.05, 1.2);
    AnalysisConfig::new()
        .with_stack(StackConfig::uniform(layer, 5.0, 5.0))
        .with_beam(4000.0, 1.0)
        .with_grid(PixelGrid::square(55.0, 200))
}

fn record_outer(
    store: &mut EventHitStore,
    config: &AnalysisConfig,
    id: i64,
    l1: (f64, f64),
    l3: (f64, f64),
) {
    let z1 = config.stack.placement(LayerId::Layer1).entry_z;
    let z3 = config.stack.placement(LayerId::Layer3).entry_z;
    store.record(id, LayerId::Layer1, Vec3::new(l1.0, l1.1, z1));
    store.record(id, LayerId::Layer3, Vec3::new(l3.0, l3.1, z3));
}

#[test]
fn test_single_event_without_middle_hit() {
    let config = reference_config();
    let mut store = EventHitStore::new();
    record_outer(&mut store, &config, 0, (1.0, 2.0), (1.4, 2.8));

    let reports = analyze_store(&store, &config);
    assert_eq!(reports.len(), 1);
    let row = reports[0].deflection;

    assert_eq!(row.error_mm, None);
    assert!(!row.has_actual);

    let z1 = config.stack.placement(LayerId::Layer1).entry_z;
    let z2 = config.stack.placement(LayerId::Layer2).entry_z;
    let z3 = config.stack.placement(LayerId::Layer3).entry_z;
    let t = (z2 - z1) / (z3 - z1);
    assert_relative_eq!(t, 0.5, epsilon = 1e-12);

    // Pixel-snapped endpoints: (0.9625, 2.0625) and (1.5125, 2.8875).
    assert_relative_eq!(row.predicted.position.x, 0.9625 + (1.5125 - 0.9625) * t, epsilon = 1e-12);
    assert_relative_eq!(row.predicted.position.y, 2.0625 + (2.8875 - 2.0625) * t, epsilon = 1e-12);
    assert_relative_eq!(row.predicted.position.z, z2);

    assert_eq!(row.l1.pixel, (103, 107));
    assert_eq!(row.l3.pixel, (105, 110));
    assert_eq!(row.predicted.pixel, (104, 109));
}

#[test]
fn test_hit_on_absorber_strip() {
    let config = reference_config();
    let mut store = EventHitStore::new();
    record_outer(&mut store, &config, 0, (0.010, 0.200), (0.4, 0.8));
    record_outer(&mut store, &config, 1, (1.0, 2.0), (1.4, 2.8));

    let reports = analyze_store(&store, &config);
    assert_eq!(reports.len(), 2);
    let on_strip = reports[0].uncertainty;
    let off_strip = reports[1].uncertainty;

    assert!(on_strip.crosses_absorber);
    assert!(!off_strip.crosses_absorber);

    let extra = 40e-6 / Material::aluminium().radiation_length_mm()
        + 3e-6 / Material::alumina().radiation_length_mm();
    assert_relative_eq!(
        on_strip.radiation_lengths - off_strip.radiation_lengths,
        extra,
        epsilon = 1e-15
    );
    assert!(on_strip.sigma_mm.sigma_x > off_strip.sigma_mm.sigma_x);

    let analyzer = EventAnalyzer::new(&config);
    let lever = analyzer.middle_entry_z() - config.stack.placement(LayerId::Layer1).entry_z;
    let theta0 = highland_theta0(4000.0, 1.0, on_strip.radiation_lengths);
    assert_relative_eq!(on_strip.sigma_mm.sigma_x, lever * theta0, epsilon = 1e-15);
    assert_relative_eq!(on_strip.sigma_mm.r95 / on_strip.sigma_mm.sigma_x, 2.4477, epsilon = 5e-5);
}

#[test]
fn test_shard_merge_matches_serial() {
    let config = reference_config();

    let mut serial = EventHitStore::new();
    let mut shards = vec![EventHitStore::new(), EventHitStore::new()];
    for id in 0..10 {
        let x = id as f64 * 0.3;
        record_outer(&mut serial, &config, id, (x, -x), (x + 0.2, -x - 0.2));
        let shard = &mut shards[(id % 2) as usize];
        record_outer(shard, &config, id, (x, -x), (x + 0.2, -x - 0.2));
    }

    let merged = EventHitStore::merge_shards(shards);
    assert_eq!(analyze_store(&merged, &config), analyze_store(&serial, &config));
}
