/// Stiffness/damping pair for one spring-damped axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringParams {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }

    /// Whether a semi-implicit Euler step of `dt` stays inside the unit circle.
    pub fn is_stable_at(self, dt: f64) -> bool {
        let c = self.damping * dt;
        let k = self.stiffness * dt * dt;
        self.stiffness >= 0.0 && self.damping >= 0.0 && c < 2.0 && k + 2.0 * c < 4.0
    }
}

/// Position/velocity state of a 2nd-order oscillator.
///
/// Each physical quantity owns its own `Spring`; axes never share state.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Spring {
    pub position: f64,
    pub velocity: f64,
}

impl Spring {
    pub fn at_rest(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }

    /// Semi-implicit Euler step toward `target`.
    ///
    /// `dt` is expected to be pre-clamped with [`clamp_dt`].
    pub fn step(&mut self, target: f64, params: SpringParams, dt: f64) {
        let force = (target - self.position) * params.stiffness - self.velocity * params.damping;
        self.velocity += force * dt;
        self.position += self.velocity * dt;
    }

    pub fn is_settled(&self, target: f64, epsilon: f64) -> bool {
        (self.position - target).abs() <= epsilon && self.velocity.abs() <= epsilon
    }
}

/// Clamp a wall-clock step into `[0, max_dt]`; non-finite steps become zero.
pub fn clamp_dt(dt: f64, max_dt: f64) -> f64 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, max_dt.max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/physics/spring.rs"]
mod tests;
