use std::sync::Arc;

use crate::{
    foundation::core::{circular_distance_deg, forward_delta_deg, normalize_deg},
    frames::model::{Frame, Role},
};

/// Which frames a rotation viewer may show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrbitFilter {
    /// Required role; `None` accepts any role.
    pub role: Option<Role>,
    /// Reject close-in material.
    pub exclude_macro: bool,
}

impl Default for OrbitFilter {
    fn default() -> Self {
        Self {
            role: Some(Role::Orbit),
            exclude_macro: true,
        }
    }
}

impl OrbitFilter {
    /// Every frame with a finite angle.
    pub const ANY: Self = Self {
        role: None,
        exclude_macro: false,
    };

    pub fn accepts(&self, frame: &Frame) -> bool {
        frame.angle.is_some_and(f64::is_finite)
            && self.role.is_none_or(|r| frame.role == r)
            && !(self.exclude_macro && frame.is_macro())
    }
}

/// Frame whose angle is circularly nearest to `angle_deg`. Ties go to the earlier frame.
///
/// `None` when no frame passes `filter`; callers keep their previous selection.
pub fn quantize(
    angle_deg: f64,
    frames: &[Arc<Frame>],
    filter: &OrbitFilter,
) -> Option<Arc<Frame>> {
    let target = normalize_deg(angle_deg);
    let mut best: Option<(&Arc<Frame>, f64)> = None;
    for frame in frames.iter().filter(|f| filter.accepts(f)) {
        let Some(angle) = frame.angle else {
            continue;
        };
        let d = circular_distance_deg(target, angle);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((frame, d));
        }
    }
    best.map(|(f, _)| Arc::clone(f))
}

/// Two neighbouring frames around an angle and the blend position between them.
#[derive(Clone, Debug)]
pub struct Bracket {
    /// Last frame at or below the angle (wrapping to the highest angle).
    pub a: Arc<Frame>,
    /// Next frame after `a` (wrapping to the lowest angle).
    pub b: Arc<Frame>,
    /// `0.0` shows `a`, `1.0` shows `b`.
    pub t: f64,
}

/// Bracketing pair for `angle_deg` among frames carrying an angle.
///
/// `None` with fewer than two such frames.
pub fn bracket(angle_deg: f64, frames: &[Arc<Frame>]) -> Option<Bracket> {
    let mut ring: Vec<(&Arc<Frame>, f64)> = frames
        .iter()
        .filter_map(|f| {
            f.angle
                .filter(|a| a.is_finite())
                .map(|a| (f, normalize_deg(a)))
        })
        .collect();
    if ring.len() < 2 {
        return None;
    }
    // Stable: equal angles keep pool order.
    ring.sort_by(|x, y| x.1.total_cmp(&y.1));

    let target = normalize_deg(angle_deg);
    let i = ring
        .iter()
        .rposition(|&(_, a)| a <= target)
        .unwrap_or(ring.len() - 1);
    let j = (i + 1) % ring.len();
    let (a, a_deg) = ring[i];
    let (b, b_deg) = ring[j];

    let span = forward_delta_deg(a_deg, b_deg);
    let t = if span > 0.0 {
        (forward_delta_deg(a_deg, target) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(Bracket {
        a: Arc::clone(a),
        b: Arc::clone(b),
        t,
    })
}

/// Frames in the pitch row nearest to `pitch_deg`. Frames without a pitch sit at 0.
pub fn nearest_pitch_row(pitch_deg: f64, frames: &[Arc<Frame>]) -> Vec<Arc<Frame>> {
    const ROW_EPS: f64 = 1e-6;
    let pitch_of = |f: &Frame| f.pitch.filter(|p| p.is_finite()).unwrap_or(0.0);

    let Some(row) = frames.iter().map(|f| pitch_of(f.as_ref())).min_by(|x, y| {
        (x - pitch_deg).abs().total_cmp(&(y - pitch_deg).abs())
    }) else {
        return Vec::new();
    };
    frames
        .iter()
        .filter(|f| (pitch_of(f.as_ref()) - row).abs() <= ROW_EPS)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/orbit/quantize.rs"]
mod tests;
