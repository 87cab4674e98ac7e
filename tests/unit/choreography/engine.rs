use super::*;
use crate::frames::model::{EnergyTier, Role};

fn frames() -> Vec<Frame> {
    vec![
        Frame::new("base", EnergyTier::Low).with_role(Role::Base),
        Frame::new("low", EnergyTier::Low),
        Frame::new("mid", EnergyTier::Mid),
        Frame::new("high", EnergyTier::High),
    ]
}

fn loud() -> AudioFeatures {
    AudioFeatures::new(1.0, 1.0, 1.0, 1.0)
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = ChoreoConfig::default();
    cfg.springs.max_dt = 0.0;
    assert!(Engine::new(cfg).is_err());
}

#[test]
fn first_tick_has_zero_dt() {
    let mut engine = Engine::with_frames(ChoreoConfig::default(), frames()).unwrap();
    let status = engine.tick(&TickInput::new(5.0, loud()));
    assert_eq!(status.smoothed, AudioFeatures::default());
    assert!(status.beat.is_none());
    assert_eq!(status.fps, 0.0);
    assert_eq!(status.pose_id.as_ref().map(PoseId::as_str), Some("base"));
}

#[test]
fn long_gaps_clamp_physics_but_not_fps() {
    let mut engine = Engine::with_frames(ChoreoConfig::default(), frames()).unwrap();
    engine.tick(&TickInput::new(0.0, AudioFeatures::default()));
    let status = engine.tick(&TickInput::new(30.0, loud()));
    assert!((status.fps - 1.0 / 30.0).abs() < 1e-12);
    // One 0.1 s step at rate 30 covers 1 - e^-3 of the way, not all of it.
    let expected = 1.0 - (-3.0f64).exp();
    assert!((status.smoothed.bass - expected).abs() < 1e-9);
}

#[test]
fn non_finite_timestamps_do_not_stall_triggers() {
    let mut cfg = ChoreoConfig::default();
    cfg.stutter.mid_threshold = 1.0;
    cfg.stutter.high_threshold = 1.0;
    let mut engine = Engine::with_frames(cfg, frames()).unwrap();
    let bass = AudioFeatures::new(1.0, 0.0, 0.0, 1.0);

    for i in 0..30 {
        engine.tick(&TickInput::new(f64::from(i) * 0.01, bass));
    }
    let before = engine.rhythm().beat_counter();
    let last_beat = engine.rhythm().last_beat_s();

    for bad in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
        let status = engine.tick(&TickInput::new(bad, bass));
        assert!(status.beat.is_none() && status.stutter.is_none());
        assert_eq!(engine.rhythm().last_beat_s(), last_beat);
        assert_eq!(engine.rhythm().beat_counter(), before);
    }

    let mut beats = 0;
    for i in 30..600 {
        let status = engine.tick(&TickInput::new(f64::from(i) * 0.01, bass));
        if status.beat.is_some() {
            beats += 1;
        }
    }
    // Sustained bass re-fires once per 0.35 s refractory window.
    assert!(beats >= 14, "beats={beats}");
    assert!(engine.rhythm().last_beat_s().is_some_and(f64::is_finite));
}

#[test]
fn nan_first_tick_is_inert() {
    let mut engine = Engine::with_frames(ChoreoConfig::default(), frames()).unwrap();
    let status = engine.tick(&TickInput::new(f64::NAN, loud()));
    assert!(status.beat.is_none() && status.stutter.is_none());
    assert_eq!(engine.rhythm().last_beat_s(), None);
    assert_eq!(engine.rhythm().last_stutter_s(), None);
}

#[test]
fn silence_keeps_rig_at_rest() {
    let mut engine = Engine::with_frames(ChoreoConfig::default(), frames()).unwrap();
    for i in 0..200 {
        let status = engine.tick(&TickInput::new(f64::from(i) * 0.016, AudioFeatures::default()));
        assert_eq!(status.transform, PoseTransform::default());
        assert!(status.beat.is_none() && status.stutter.is_none());
    }
    let settle = engine.config().decay.settle_epsilon;
    assert!(engine.physics().is_settled(engine.rotation(), settle));
}

#[test]
fn scratch_claims_selection_on_a_shared_tick() {
    let mut cfg = ChoreoConfig::default();
    cfg.stutter.high_threshold = 1.0;
    let mut engine = Engine::with_frames(cfg, frames()).unwrap();
    // Equal smoothing rates: bass and mid cross their 0.6 thresholds on the same tick.
    let mut shared = None;
    for i in 0..50 {
        let status = engine.tick(&TickInput::new(f64::from(i) * 0.01, loud()));
        if status.beat.is_some() {
            shared = Some(status);
            break;
        }
    }
    let status = shared.expect("a beat within 0.5 s of full bass");
    assert!(status.scratch_mode);
    assert!(status.stutter.is_some());
    let beat = status.beat.unwrap();
    assert!(beat.suppressed);
    assert_eq!(beat.pose, None);
    assert_eq!(beat.beat_counter, 1);

    let next = engine.tick(&TickInput::new(0.5, AudioFeatures::default()));
    assert!(!next.scratch_mode);
}

#[test]
fn beat_kicks_camera() {
    let mut cfg = ChoreoConfig::default();
    cfg.stutter.mid_threshold = 1.0;
    cfg.stutter.high_threshold = 1.0;
    let mut engine = Engine::with_frames(cfg, frames()).unwrap();
    let bass = AudioFeatures::new(1.0, 0.0, 0.0, 0.0);
    let mut beat_at = None;
    for i in 0..50 {
        let status = engine.tick(&TickInput::new(f64::from(i) * 0.01, bass));
        if let Some(beat) = status.beat {
            assert!(!beat.suppressed);
            assert!(beat.pose.is_some());
            beat_at = Some(i);
            break;
        }
    }
    assert!(beat_at.is_some());
    assert!(engine.physics().zoom_target.value > 1.0);
    assert!(engine.physics().ghost.value > 0.0);
}

#[test]
fn replacing_frames_reanchors_target() {
    let mut engine = Engine::with_frames(ChoreoConfig::default(), frames()).unwrap();
    engine.tick(&TickInput::new(0.0, AudioFeatures::default()));
    assert_eq!(
        engine.current_frame().map(|f| f.pose_id.as_str()),
        Some("base")
    );

    engine.replace_frames(vec![
        Frame::new("other", EnergyTier::Mid),
        Frame::new("stand", EnergyTier::Low).with_role(Role::Base),
    ]);
    assert_eq!(
        engine.rhythm().target_pose().map(PoseId::as_str),
        Some("stand")
    );
    let status = engine.tick(&TickInput::new(0.016, AudioFeatures::default()));
    assert_eq!(status.pose_id.as_ref().map(PoseId::as_str), Some("stand"));

    engine.replace_frames(Vec::new());
    assert!(engine.current_frame().is_none());
    let status = engine.tick(&TickInput::new(0.032, loud()));
    assert_eq!(status.pose_id, None);
}

#[test]
fn empty_engine_never_panics() {
    let mut engine = Engine::new(ChoreoConfig::default()).unwrap();
    for i in 0..400 {
        let status = engine.tick(&TickInput::new(f64::from(i) * 0.01, loud()));
        assert!(status.beat_counter < 16);
    }
    assert!(engine.plan_layers().is_empty());
}
