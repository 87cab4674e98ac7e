use super::*;

#[test]
fn defaults_validate() {
    ChoreoConfig::default().validate().unwrap();
}

#[test]
fn defaults_carry_documented_constants() {
    let cfg = ChoreoConfig::default();
    assert_eq!(cfg.rhythm.bass_threshold, 0.6);
    assert_eq!(cfg.rhythm.refractory_s, 0.35);
    assert_eq!(cfg.rhythm.max_resample_attempts, 3);
    assert_eq!(cfg.stutter.mid_threshold, 0.6);
    assert_eq!(cfg.stutter.high_threshold, 0.5);
    assert_eq!(cfg.stutter.refractory_s, 0.06);
    assert_eq!(cfg.stutter.rewind_probability, 0.4);
    assert_eq!(cfg.springs.max_dt, 0.1);
    assert_eq!(cfg.orbit.wheel_scale, 0.5);
    assert_eq!(cfg.compositor.ghost_zoom, 1.2);
    assert_eq!(cfg.compositor.echo_zoom, 1.02);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = ChoreoConfig::from_json_str(
        r#"{ "seed": 9, "stutter": { "rewind_probability": 0.25 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.stutter.rewind_probability, 0.25);
    assert_eq!(cfg.stutter.high_threshold, 0.5);
    assert_eq!(cfg.rhythm, RhythmConfig::default());
}

#[test]
fn json_roundtrip_preserves_config() {
    let cfg = ChoreoConfig {
        seed: 42,
        ..ChoreoConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(ChoreoConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn rejects_out_of_range_probability() {
    let mut cfg = ChoreoConfig::default();
    cfg.stutter.rewind_probability = 1.5;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("stutter.rewind_probability"));
}

#[test]
fn rejects_spring_unstable_at_max_dt() {
    let mut cfg = ChoreoConfig::default();
    cfg.springs.squash = SpringParams::new(400.0, 18.0);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("springs.squash"));

    cfg.springs.max_dt = 1.0 / 60.0;
    cfg.validate().unwrap();
}

#[test]
fn rejects_inverted_pitch_bounds() {
    let mut cfg = ChoreoConfig::default();
    cfg.orbit.pitch_min = 30.0;
    cfg.orbit.pitch_max = -30.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_malformed_json() {
    let err = ChoreoConfig::from_json_str("{ nope").unwrap_err();
    assert!(err.to_string().contains("config error"));
}

#[test]
fn impulse_table_maps_phases() {
    let imp = PhaseImpulses::default();
    assert!(imp.for_phase(Phase::SwingLeft).tilt_deg < 0.0);
    assert!(imp.for_phase(Phase::SwingRight).tilt_deg > 0.0);
    assert!(imp.for_phase(Phase::Drop).zoom > imp.for_phase(Phase::Warmup).zoom);
}
