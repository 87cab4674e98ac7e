use crate::foundation::math::exp_approach;

/// Return-to-rest curve for a transient quantity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecayCurve {
    /// `value *= exp(-rate * dt)`; the quantity rests at zero (opacities, blur).
    Exponential { rate: f64 },
    /// `value += (rest - value) * (1 - exp(-rate * dt))`; overshoot-free settling toward a
    /// non-zero rest (zoom, tilt, squash).
    Proportional { rate: f64 },
}

impl DecayCurve {
    pub fn apply(self, value: f64, rest: f64, dt: f64) -> f64 {
        match self {
            Self::Exponential { rate } => value * (1.0 - exp_approach(rate, dt)),
            Self::Proportional { rate } => value + (rest - value) * exp_approach(rate, dt),
        }
    }
}

/// A scalar that is kicked by impulses and relaxes back to `rest` every tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Transient {
    pub value: f64,
    pub rest: f64,
    pub curve: DecayCurve,
}

impl Transient {
    pub fn new(rest: f64, curve: DecayCurve) -> Self {
        // Multiplicative decay only converges toward zero.
        let rest = match curve {
            DecayCurve::Exponential { .. } => 0.0,
            DecayCurve::Proportional { .. } => rest,
        };
        Self {
            value: rest,
            rest,
            curve,
        }
    }

    /// Replace the current value.
    pub fn kick(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value;
        }
    }

    /// Raise the current value to at least `value`.
    pub fn kick_max(&mut self, value: f64) {
        if value.is_finite() {
            self.value = self.value.max(value);
        }
    }

    /// Relax toward rest; values within `epsilon` of rest snap to it.
    pub fn decay(&mut self, dt: f64, epsilon: f64) {
        self.value = self.curve.apply(self.value, self.rest, dt);
        if (self.value - self.rest).abs() <= epsilon {
            self.value = self.rest;
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.value == self.rest
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/decay.rs"]
mod tests;
