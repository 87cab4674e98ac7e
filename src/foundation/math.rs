/// Seeded SplitMix64 generator.
///
/// Every probabilistic choice in the engine (pose sampling, scratch split, chaos tilt) draws
/// from one of these, so a fixed seed replays a performance exactly.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let i = (self.next_f64_01() * len as f64) as usize;
        i.min(len.saturating_sub(1))
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64_01() < p.clamp(0.0, 1.0)
    }
}

/// Fraction of the remaining distance covered by an exponential approach over `dt`.
pub(crate) fn exp_approach(rate: f64, dt: f64) -> f64 {
    1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Exponential moving average of the tick rate.
#[derive(Clone, Copy, Debug)]
pub struct FpsMeter {
    fps: f64,
    weight: f64,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self {
            fps: 0.0,
            weight: 0.1,
        }
    }
}

impl FpsMeter {
    pub fn observe(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt <= 0.0 {
            return self.fps;
        }
        let instant = 1.0 / dt;
        self.fps = if self.fps == 0.0 {
            instant
        } else {
            self.fps + (instant - self.fps) * self.weight
        };
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
