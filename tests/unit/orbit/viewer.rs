use super::*;
use crate::frames::model::EnergyTier;

fn ring_pool() -> Arc<FramePool> {
    Arc::new(FramePool::build(
        [0.0, 90.0, 180.0, 270.0]
            .into_iter()
            .map(|a| Frame::orbit(format!("o{a}"), a)),
    ))
}

fn snapping() -> OrbitConfig {
    OrbitConfig {
        interpolate: false,
        ..OrbitConfig::default()
    }
}

fn primary(v: &OrbitViewer) -> &str {
    v.primary_pose().map(PoseId::as_str).unwrap_or("")
}

#[test]
fn starts_on_the_zero_frame() {
    let v = OrbitViewer::new(OrbitConfig::default(), ring_pool());
    assert!(matches!(v.view(), Some(OrbitView::Single(f)) if f.pose_id.as_str() == "o0"));
}

#[test]
fn drag_moves_angle_and_wraps() {
    let mut v = OrbitViewer::new(snapping(), ring_pool());
    v.drag_start();
    v.drag_by(-20.0, 0.0);
    assert!((v.state().angle_deg - 340.0).abs() < 1e-9);
    assert_eq!(primary(&v), "o0");
    v.drag_by(-60.0, 0.0);
    assert_eq!(primary(&v), "o270");
}

#[test]
fn release_carries_inertia_that_dies_out() {
    let mut v = OrbitViewer::new(snapping(), ring_pool());
    v.drag_start();
    v.drag_by(10.0, 0.0);
    v.tick(0.05);
    assert!((v.state().angular_velocity - 200.0).abs() < 1e-9);
    v.drag_end();

    let before = v.state().angle_deg;
    v.tick(0.05);
    assert!(v.state().angle_deg > before);
    let mut last = v.state().angular_velocity;
    for _ in 0..400 {
        let s = *v.tick(0.05);
        assert!(s.angular_velocity <= last);
        last = s.angular_velocity;
    }
    assert_eq!(last, 0.0);
}

#[test]
fn wheel_adds_scaled_impulse() {
    let mut v = OrbitViewer::new(OrbitConfig::default(), ring_pool());
    v.wheel(100.0);
    assert_eq!(v.state().angular_velocity, 50.0);
    v.wheel(f64::NAN);
    assert_eq!(v.state().angular_velocity, 50.0);
}

#[test]
fn pitch_is_clamped() {
    let mut v = OrbitViewer::new(OrbitConfig::default(), ring_pool());
    v.drag_start();
    v.drag_by(0.0, 500.0);
    assert_eq!(v.state().pitch_deg, 90.0);
    v.set_orientation(0.0, -120.0);
    assert_eq!(v.state().pitch_deg, -90.0);
}

#[test]
fn interpolating_viewer_blends_neighbours() {
    let mut v = OrbitViewer::new(OrbitConfig::default(), ring_pool());
    v.set_orientation(45.0, 0.0);
    match v.view() {
        Some(OrbitView::Blend(b)) => {
            assert_eq!(b.a.pose_id.as_str(), "o0");
            assert_eq!(b.b.pose_id.as_str(), "o90");
            assert!((b.t - 0.5).abs() < 1e-9);
        }
        other => panic!("expected blend, got {other:?}"),
    }
    v.set_orientation(90.0, 0.0);
    assert!(matches!(v.view(), Some(OrbitView::Single(f)) if f.pose_id.as_str() == "o90"));
}

#[test]
fn auto_rotate_turns_when_idle() {
    let cfg = OrbitConfig {
        auto_rotate_dps: 30.0,
        ..snapping()
    };
    let mut v = OrbitViewer::new(cfg, ring_pool());
    for _ in 0..10 {
        v.tick(0.1);
    }
    assert!((v.state().angle_deg - 30.0).abs() < 1e-9);
}

#[test]
fn empty_pool_keeps_previous_selection() {
    let mut v = OrbitViewer::new(snapping(), ring_pool());
    v.set_orientation(90.0, 0.0);
    assert_eq!(primary(&v), "o90");

    let no_orbit = Arc::new(FramePool::build(vec![Frame::new("dance", EnergyTier::Mid)]));
    v.swap_pool(no_orbit);
    v.set_orientation(200.0, 0.0);
    assert_eq!(primary(&v), "o90");

    v.swap_pool(ring_pool());
    assert_eq!(primary(&v), "o180");
}

#[test]
fn empty_viewer_has_no_view() {
    let v = OrbitViewer::new(OrbitConfig::default(), Arc::new(FramePool::empty()));
    assert!(v.view().is_none());
    assert!(v.primary_pose().is_none());
}

#[test]
fn single_orbit_frame_falls_back_to_quantizer() {
    let pool = Arc::new(FramePool::build(vec![Frame::orbit("only", 120.0)]));
    let v = OrbitViewer::new(OrbitConfig::default(), pool);
    assert_eq!(primary(&v), "only");
}

#[test]
fn filter_decides_which_angled_frames_show() {
    let pool = Arc::new(FramePool::build(vec![
        Frame::orbit("front", 0.0),
        Frame::orbit("back", 180.0),
        Frame::new("lunge", EnergyTier::High).with_angle(90.0),
    ]));

    let mut turnaround_only = OrbitViewer::new(snapping(), Arc::clone(&pool));
    turnaround_only.set_orientation(60.0, 0.0);
    assert_eq!(primary(&turnaround_only), "front");

    let mut any = OrbitViewer::new(snapping(), pool).with_filter(OrbitFilter::ANY);
    any.set_orientation(60.0, 0.0);
    assert_eq!(primary(&any), "lunge");
}
