use crate::{
    config::model::{DecayConfig, SpringConfig},
    physics::{
        decay::{DecayCurve, Transient},
        spring::Spring,
    },
};

const SQUASH_MIN: f64 = 0.2;
const SQUASH_MAX: f64 = 5.0;
const ZOOM_MIN: f64 = 0.05;

/// Camera kick fired on a beat registration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraImpulse {
    /// Zoom offset added on top of the resting zoom of 1.0.
    pub zoom: f64,
    /// Vertical squash factor (1.0 is neutral).
    pub squash: f64,
    /// Tilt in degrees.
    pub tilt_deg: f64,
    /// Ghost opacity floor.
    pub ghost: f64,
    /// Echo opacity floor.
    pub echo: f64,
}

impl CameraImpulse {
    pub const NEUTRAL: Self = Self {
        zoom: 0.0,
        squash: 1.0,
        tilt_deg: 0.0,
        ghost: 0.0,
        echo: 0.0,
    };
}

/// Spring targets for the three rotation axes, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationTargets {
    pub x_deg: f64,
    pub y_deg: f64,
    pub z_deg: f64,
}

/// Snapshot of every quantity the compositor reads.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PoseTransform {
    pub rot_x_deg: f64,
    pub rot_y_deg: f64,
    pub rot_z_deg: f64,
    pub tilt_deg: f64,
    pub squash: f64,
    pub skew: f64,
    pub zoom: f64,
    pub ghost: f64,
    pub echo: f64,
    pub stutter_blur: f64,
}

impl Default for PoseTransform {
    fn default() -> Self {
        Self {
            rot_x_deg: 0.0,
            rot_y_deg: 0.0,
            rot_z_deg: 0.0,
            tilt_deg: 0.0,
            squash: 1.0,
            skew: 0.0,
            zoom: 1.0,
            ghost: 0.0,
            echo: 0.0,
            stutter_blur: 0.0,
        }
    }
}

/// Every spring-damped and decaying quantity of one performance.
///
/// Impulses write the `*_target` transients; the decay model relaxes those targets back to
/// rest and the springs chase them. Squash and skew springs are underdamped and bounce; tilt and
/// zoom are overdamped by default and never cross rest.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PhysicsState {
    pub rot_x: Spring,
    pub rot_y: Spring,
    pub rot_z: Spring,
    pub squash: Spring,
    pub skew: Spring,
    pub tilt: Spring,
    pub zoom: Spring,
    pub squash_target: Transient,
    pub skew_target: Transient,
    pub tilt_target: Transient,
    pub zoom_target: Transient,
    pub ghost: Transient,
    pub echo: Transient,
    pub stutter_blur: Transient,
}

impl PhysicsState {
    pub fn new(decay: &DecayConfig) -> Self {
        Self {
            rot_x: Spring::at_rest(0.0),
            rot_y: Spring::at_rest(0.0),
            rot_z: Spring::at_rest(0.0),
            squash: Spring::at_rest(1.0),
            skew: Spring::at_rest(0.0),
            tilt: Spring::at_rest(0.0),
            zoom: Spring::at_rest(1.0),
            squash_target: Transient::new(
                1.0,
                DecayCurve::Proportional {
                    rate: decay.squash_rate,
                },
            ),
            skew_target: Transient::new(
                0.0,
                DecayCurve::Exponential {
                    rate: decay.skew_rate,
                },
            ),
            tilt_target: Transient::new(
                0.0,
                DecayCurve::Proportional {
                    rate: decay.tilt_rate,
                },
            ),
            zoom_target: Transient::new(
                1.0,
                DecayCurve::Proportional {
                    rate: decay.zoom_rate,
                },
            ),
            ghost: Transient::new(
                0.0,
                DecayCurve::Exponential {
                    rate: decay.ghost_rate,
                },
            ),
            echo: Transient::new(
                0.0,
                DecayCurve::Exponential {
                    rate: decay.echo_rate,
                },
            ),
            stutter_blur: Transient::new(
                0.0,
                DecayCurve::Exponential {
                    rate: decay.stutter_blur_rate,
                },
            ),
        }
    }

    pub fn apply_impulse(&mut self, impulse: &CameraImpulse) {
        self.zoom_target.kick(self.zoom_target.rest + impulse.zoom);
        self.squash_target.kick(impulse.squash);
        self.tilt_target.kick(impulse.tilt_deg);
        self.ghost.kick_max(impulse.ghost);
        self.echo.kick_max(impulse.echo);
    }

    pub fn kick_skew(&mut self, skew: f64) {
        self.skew_target.kick(skew);
    }

    pub fn kick_stutter_blur(&mut self, blur: f64) {
        self.stutter_blur.kick_max(blur);
    }

    /// Relax every transient toward rest.
    pub fn decay(&mut self, dt: f64, epsilon: f64) {
        for t in [
            &mut self.squash_target,
            &mut self.skew_target,
            &mut self.tilt_target,
            &mut self.zoom_target,
            &mut self.ghost,
            &mut self.echo,
            &mut self.stutter_blur,
        ] {
            t.decay(dt, epsilon);
        }
    }

    /// Step every spring toward its current target.
    pub fn integrate(&mut self, rotation: RotationTargets, springs: &SpringConfig, dt: f64) {
        self.rot_x.step(rotation.x_deg, springs.rotation, dt);
        self.rot_y.step(rotation.y_deg, springs.rotation, dt);
        self.rot_z.step(rotation.z_deg, springs.rotation, dt);
        self.squash
            .step(self.squash_target.value, springs.squash, dt);
        self.skew.step(self.skew_target.value, springs.skew, dt);
        self.tilt.step(self.tilt_target.value, springs.tilt, dt);
        self.zoom.step(self.zoom_target.value, springs.zoom, dt);
    }

    pub fn snapshot(&self) -> PoseTransform {
        PoseTransform {
            rot_x_deg: self.rot_x.position,
            rot_y_deg: self.rot_y.position,
            rot_z_deg: self.rot_z.position,
            tilt_deg: self.tilt.position,
            squash: self.squash.position.clamp(SQUASH_MIN, SQUASH_MAX),
            skew: self.skew.position,
            zoom: self.zoom.position.max(ZOOM_MIN),
            ghost: self.ghost.value.clamp(0.0, 1.0),
            echo: self.echo.value.clamp(0.0, 1.0),
            stutter_blur: self.stutter_blur.value.clamp(0.0, 1.0),
        }
    }

    /// `true` once every transient and spring sits at rest within `epsilon`.
    pub fn is_settled(&self, rotation: RotationTargets, epsilon: f64) -> bool {
        let transients_rest = [
            &self.squash_target,
            &self.skew_target,
            &self.tilt_target,
            &self.zoom_target,
            &self.ghost,
            &self.echo,
            &self.stutter_blur,
        ]
        .iter()
        .all(|t| t.is_at_rest());

        transients_rest
            && self.rot_x.is_settled(rotation.x_deg, epsilon)
            && self.rot_y.is_settled(rotation.y_deg, epsilon)
            && self.rot_z.is_settled(rotation.z_deg, epsilon)
            && self.squash.is_settled(self.squash_target.rest, epsilon)
            && self.skew.is_settled(self.skew_target.rest, epsilon)
            && self.tilt.is_settled(self.tilt_target.rest, epsilon)
            && self.zoom.is_settled(self.zoom_target.rest, epsilon)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/state.rs"]
mod tests;
