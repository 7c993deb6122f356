use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;
use tritrack_core::{AnalysisConfig, LayerId, TransportObserver};
use tritrack_io::{
    replay, NotificationReader, ReportFiles, RunSession, DEFLECTION_HEADER, UNCERTAINTY_HEADER,
};

fn crossing(event: i64, volume: &str, pos: [f64; 3]) -> String {
    format!(
        r#"{{"event_id":{event},"pre_volume":"Layer_mother","post_volume":"{volume}","geometric_boundary":true,"parent_id":0,"position":[{},{},{}]}}"#,
        pos[0], pos[1], pos[2]
    )
}

fn rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .skip(1)
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

/// Downward muons: Layer3 first, then Layer2, then Layer1.
fn sample_run(config: &AnalysisConfig) -> String {
    let z1 = config.stack.placement(LayerId::Layer1).entry_z;
    let z2 = config.stack.placement(LayerId::Layer2).entry_z;
    let z3 = config.stack.placement(LayerId::Layer3).entry_z;

    let mut s = String::new();
    // Event 0: all three layers, entering through the oxide on Layer3.
    writeln!(s, "{}", crossing(0, "Layer3_Al2O3_phys", [0.4, 0.8, z3])).unwrap();
    writeln!(s, "{}", crossing(0, "Layer3_AlStrip_phys", [0.4, 0.8, z3 - 3e-6])).unwrap();
    writeln!(s, "{}", crossing(0, "Layer2_NbTiN_phys", [0.2, 0.5, z2])).unwrap();
    writeln!(s, "{}", crossing(0, "Layer1_Al2O3_phys", [0.01, 0.2, z1])).unwrap();
    // Event 1: misses the middle plane.
    writeln!(s, "{}", crossing(1, "Layer3_NbTiN_phys", [1.4, 2.8, z3])).unwrap();
    writeln!(s, "{}", crossing(1, "Layer1_NbTiN_phys", [1.0, 2.0, z1])).unwrap();
    // Event 2: leaves the stack before Layer1.
    writeln!(s, "{}", crossing(2, "Layer3_NbTiN_phys", [27.0, 27.0, z3])).unwrap();
    writeln!(s, "{}", crossing(2, "Layer2_NbTiN_phys", [27.2, 27.2, z2])).unwrap();
    // Event 3: only a secondary reaches Layer1.
    writeln!(s, "{}", crossing(3, "Layer3_Si_phys", [5.0, 5.0, z3])).unwrap();
    writeln!(
        s,
        r#"{{"event_id":3,"post_volume":"Layer1_Si_phys","geometric_boundary":true,"parent_id":2,"position":[5.0,5.0,{z1}]}}"#
    )
    .unwrap();
    s
}

#[test]
fn test_replay_writes_both_reports() {
    let dir = tempdir().unwrap();
    let config = AnalysisConfig::default();
    let input = sample_run(&config);

    let mut session = RunSession::new(config, ReportFiles::in_dir(dir.path()));
    let summary = replay(&mut session, NotificationReader::new(Cursor::new(input))).unwrap();

    assert_eq!(summary.events_recorded, 4);
    assert_eq!(summary.events_reported, 2);
    assert_eq!(summary.events_with_middle_hit, 1);

    let deflection = fs::read_to_string(dir.path().join(ReportFiles::DEFLECTION_FILE)).unwrap();
    let uncertainty = fs::read_to_string(dir.path().join(ReportFiles::UNCERTAINTY_FILE)).unwrap();
    assert_eq!(deflection.lines().next().unwrap(), DEFLECTION_HEADER);
    assert_eq!(uncertainty.lines().next().unwrap(), UNCERTAINTY_HEADER);

    let d = rows(&deflection);
    let u = rows(&uncertainty);
    let d_ids: Vec<&str> = d.iter().map(|r| r[0].as_str()).collect();
    let u_ids: Vec<&str> = u.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(d_ids, vec!["0", "1"]);
    assert_eq!(u_ids, vec!["0", "1"]);

    // First crossing of Layer3 (the oxide) is kept.
    assert_eq!(d[0][4], "0.400000");
    // Event 0 has a real middle hit; event 1 gets the sentinel.
    assert_ne!(d[0][13], "-1.000000");
    assert_eq!(d[1][13], "-1.000000");

    assert_eq!(u[0][11], "1");
    assert_eq!(u[1][11], "0");
}

#[test]
fn test_second_run_truncates_reports() {
    let dir = tempdir().unwrap();
    let config = AnalysisConfig::default();
    let input = sample_run(&config);
    let mut session = RunSession::new(config, ReportFiles::in_dir(dir.path()));

    replay(&mut session, NotificationReader::new(Cursor::new(input.clone()))).unwrap();
    let first = fs::read_to_string(dir.path().join(ReportFiles::DEFLECTION_FILE)).unwrap();

    replay(&mut session, NotificationReader::new(Cursor::new(input))).unwrap();
    let second = fs::read_to_string(dir.path().join(ReportFiles::DEFLECTION_FILE)).unwrap();
    assert_eq!(first, second);

    session.on_run_begin();
    let summary = session.on_run_end().unwrap();
    assert_eq!(summary.events_reported, 0);
    let empty = fs::read_to_string(dir.path().join(ReportFiles::UNCERTAINTY_FILE)).unwrap();
    assert_eq!(empty.lines().count(), 1);
}

#[test]
fn test_malformed_record_still_reports_earlier_events() {
    let dir = tempdir().unwrap();
    let config = AnalysisConfig::default();
    let mut input = sample_run(&config);
    input.push_str("{ broken\n");

    let mut session = RunSession::new(config, ReportFiles::in_dir(dir.path()));
    let result = replay(&mut session, NotificationReader::new(Cursor::new(input)));
    assert!(matches!(
        result,
        Err(tritrack_io::Error::InvalidNotification { line: 11, .. })
    ));

    let deflection = fs::read_to_string(dir.path().join(ReportFiles::DEFLECTION_FILE)).unwrap();
    assert_eq!(rows(&deflection).len(), 2);
}
