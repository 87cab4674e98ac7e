use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Full turn in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ChoreoResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChoreoError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) * 0.5, f64::from(self.height) * 0.5)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round tiny negatives up to exactly 360.
    if wrapped >= FULL_TURN_DEG {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_delta_deg(from: f64, to: f64) -> f64 {
    let d = normalize_deg(to - from);
    if d > 180.0 { d - FULL_TURN_DEG } else { d }
}

/// Unsigned circular distance in `[0, 180]`.
pub fn circular_distance_deg(a: f64, b: f64) -> f64 {
    shortest_delta_deg(a, b).abs()
}

/// Forward (counter-clockwise) distance from `from` to `to`, in `[0, 360)`.
pub fn forward_delta_deg(from: f64, to: f64) -> f64 {
    normalize_deg(to - from)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
