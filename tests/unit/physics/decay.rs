use super::*;

fn assert_monotone_to_rest(mut t: Transient, dt: f64) {
    let mut prev_gap = (t.value - t.rest).abs();
    for _ in 0..2000 {
        t.decay(dt, 1e-6);
        let gap = (t.value - t.rest).abs();
        assert!(gap <= prev_gap, "gap grew from {prev_gap} to {gap}");
        prev_gap = gap;
    }
    assert!(t.is_at_rest());
}

#[test]
fn exponential_decays_monotonically_to_zero() {
    let mut t = Transient::new(0.0, DecayCurve::Exponential { rate: 6.0 });
    t.kick(0.8);
    assert_monotone_to_rest(t, 1.0 / 60.0);
}

#[test]
fn exponential_ignores_nonzero_rest() {
    let t = Transient::new(5.0, DecayCurve::Exponential { rate: 6.0 });
    assert_eq!(t.rest, 0.0);
}

#[test]
fn proportional_settles_from_both_sides_without_overshoot() {
    for start in [0.6, 1.4] {
        let mut t = Transient::new(1.0, DecayCurve::Proportional { rate: 4.0 });
        t.kick(start);
        let above = start > 1.0;
        for _ in 0..500 {
            t.decay(1.0 / 60.0, 1e-6);
            if above {
                assert!(t.value >= 1.0);
            } else {
                assert!(t.value <= 1.0);
            }
        }
        assert!(t.is_at_rest());
    }
}

#[test]
fn proportional_is_monotone_for_large_steps() {
    let mut t = Transient::new(0.0, DecayCurve::Proportional { rate: 5.0 });
    t.kick(-12.0);
    assert_monotone_to_rest(t, 0.1);
}

#[test]
fn zero_dt_is_a_noop() {
    let mut t = Transient::new(0.0, DecayCurve::Exponential { rate: 6.0 });
    t.kick(0.5);
    t.decay(0.0, 1e-9);
    assert_eq!(t.value, 0.5);
}

#[test]
fn kick_max_only_raises() {
    let mut t = Transient::new(0.0, DecayCurve::Exponential { rate: 6.0 });
    t.kick(0.5);
    t.kick_max(0.2);
    assert_eq!(t.value, 0.5);
    t.kick_max(0.9);
    assert_eq!(t.value, 0.9);
    t.kick(f64::NAN);
    assert_eq!(t.value, 0.9);
}
