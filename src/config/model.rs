use crate::{
    choreography::rhythm::Phase,
    foundation::error::{ChoreoError, ChoreoResult},
    physics::{spring::SpringParams, state::CameraImpulse},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Complete tuning surface of the engine.
///
/// Every field has a default, so a JSON document only needs to name what it overrides.
/// Thresholds, refractory windows and rates are hand-tuned values, not correctness
/// invariants; [`ChoreoConfig::validate`] only rejects values that would break the
/// numerical model.
pub struct ChoreoConfig {
    /// Low-pass rates for incoming band energies.
    pub smoothing: SmoothingConfig,
    /// Spring constants per physical quantity.
    pub springs: SpringConfig,
    /// Audio-to-rotation mapping between beats.
    pub motion: MotionConfig,
    /// Beat detection, pose selection and per-phase impulses.
    pub rhythm: RhythmConfig,
    /// Stutter/scratch override.
    pub stutter: StutterConfig,
    /// Return-to-rest rates.
    pub decay: DecayConfig,
    /// Layer compositing.
    pub compositor: CompositorConfig,
    /// Rotation viewer.
    pub orbit: OrbitConfig,
    /// Seed of the pose-sampling PRNG.
    pub seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Exponential smoothing rates (per second) for each band.
pub struct SmoothingConfig {
    /// Bass band rate.
    pub bass_rate: f64,
    /// Mid band rate.
    pub mid_rate: f64,
    /// High band rate.
    pub high_rate: f64,
    /// Overall energy rate.
    pub energy_rate: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            bass_rate: 30.0,
            mid_rate: 30.0,
            high_rate: 30.0,
            energy_rate: 12.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Spring constants and the physics step bound.
pub struct SpringConfig {
    /// Upper bound for one physics step in seconds.
    pub max_dt: f64,
    /// Shared by the x/y/z rotation axes.
    pub rotation: SpringParams,
    /// Vertical squash.
    pub squash: SpringParams,
    /// Horizontal skew.
    pub skew: SpringParams,
    /// Camera tilt.
    pub tilt: SpringParams,
    /// Camera zoom.
    pub zoom: SpringParams,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            rotation: SpringParams::new(90.0, 9.0),
            squash: SpringParams::new(180.0, 8.0),
            skew: SpringParams::new(160.0, 7.0),
            // Overdamped: tilt and zoom settle without crossing rest.
            tilt: SpringParams::new(50.0, 15.0),
            zoom: SpringParams::new(50.0, 15.0),
        }
    }
}

impl SpringConfig {
    fn all(&self) -> [(&'static str, SpringParams); 5] {
        [
            ("rotation", self.rotation),
            ("squash", self.squash),
            ("skew", self.skew),
            ("tilt", self.tilt),
            ("zoom", self.zoom),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// How smoothed bands steer the rotation springs between beats.
pub struct MotionConfig {
    /// Forward nod (x rotation) at full bass, degrees.
    pub nod_deg: f64,
    /// Sideways sway (y rotation) at full mid during swing phases, degrees.
    pub sway_deg: f64,
    /// Roll (z rotation) amplitude at full energy, degrees.
    pub roll_deg: f64,
    /// Roll oscillation frequency in Hz.
    pub roll_hz: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            nod_deg: 6.0,
            sway_deg: 10.0,
            roll_deg: 3.0,
            roll_hz: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Camera impulse fired per phase.
pub struct PhaseImpulses {
    /// Steps 0-3.
    pub warmup: CameraImpulse,
    /// Steps 4-7.
    pub swing_left: CameraImpulse,
    /// Steps 8-11.
    pub swing_right: CameraImpulse,
    /// Steps 12-13.
    pub drop: CameraImpulse,
    /// Steps 14-15; its tilt is replaced by a random tilt.
    pub chaos: CameraImpulse,
}

impl Default for PhaseImpulses {
    fn default() -> Self {
        Self {
            warmup: CameraImpulse {
                zoom: 0.02,
                squash: 0.97,
                tilt_deg: 0.0,
                ghost: 0.2,
                echo: 0.15,
            },
            swing_left: CameraImpulse {
                zoom: 0.04,
                squash: 0.94,
                tilt_deg: -5.0,
                ghost: 0.3,
                echo: 0.25,
            },
            swing_right: CameraImpulse {
                zoom: 0.04,
                squash: 0.94,
                tilt_deg: 5.0,
                ghost: 0.3,
                echo: 0.25,
            },
            drop: CameraImpulse {
                zoom: 0.12,
                squash: 0.85,
                tilt_deg: 0.0,
                ghost: 0.6,
                echo: 0.4,
            },
            chaos: CameraImpulse {
                zoom: 0.08,
                squash: 0.9,
                tilt_deg: 0.0,
                ghost: 0.5,
                echo: 0.35,
            },
        }
    }
}

impl PhaseImpulses {
    /// Impulse for `phase`.
    pub fn for_phase(&self, phase: Phase) -> CameraImpulse {
        match phase {
            Phase::Warmup => self.warmup,
            Phase::SwingLeft => self.swing_left,
            Phase::SwingRight => self.swing_right,
            Phase::Drop => self.drop,
            Phase::Chaos => self.chaos,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Beat detection and pose selection.
pub struct RhythmConfig {
    /// Smoothed bass level that registers a beat.
    pub bass_threshold: f64,
    /// Minimum seconds between registered beats.
    pub refractory_s: f64,
    /// Re-draws allowed when a pick repeats the current pose.
    pub max_resample_attempts: u32,
    /// Bound of the random chaos tilt, degrees.
    pub chaos_tilt_deg: f64,
    /// Per-phase camera impulses.
    pub impulses: PhaseImpulses,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            bass_threshold: 0.6,
            refractory_s: 0.35,
            max_resample_attempts: 3,
            chaos_tilt_deg: 10.0,
            impulses: PhaseImpulses::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// High-frequency scratch override.
pub struct StutterConfig {
    /// Smoothed mid level that triggers a scratch.
    pub mid_threshold: f64,
    /// Smoothed high level that triggers a scratch.
    pub high_threshold: f64,
    /// Minimum seconds between scratches.
    pub refractory_s: f64,
    /// Probability of a rewind scratch; the rest jump to a random high/macro pose.
    pub rewind_probability: f64,
    /// Bound of the random skew kick on rewind.
    pub skew_max: f64,
    /// Stutter-blur level set on rewind.
    pub blur_max: f64,
}

impl Default for StutterConfig {
    fn default() -> Self {
        Self {
            mid_threshold: 0.6,
            high_threshold: 0.5,
            refractory_s: 0.06,
            rewind_probability: 0.4,
            skew_max: 0.25,
            blur_max: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Return-to-rest rates (per second).
pub struct DecayConfig {
    /// Ghost opacity.
    pub ghost_rate: f64,
    /// Echo opacity.
    pub echo_rate: f64,
    /// Stutter blur.
    pub stutter_blur_rate: f64,
    /// Skew target.
    pub skew_rate: f64,
    /// Squash target.
    pub squash_rate: f64,
    /// Tilt target.
    pub tilt_rate: f64,
    /// Zoom target.
    pub zoom_rate: f64,
    /// Distance from rest below which a transient snaps to rest.
    pub settle_epsilon: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            ghost_rate: 6.0,
            echo_rate: 5.0,
            stutter_blur_rate: 14.0,
            skew_rate: 10.0,
            squash_rate: 8.0,
            tilt_rate: 5.0,
            zoom_rate: 4.0,
            settle_epsilon: 1e-4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Layer compositing.
pub struct CompositorConfig {
    /// Zoom multiplier of the ghost layer.
    pub ghost_zoom: f64,
    /// Ghost opacity below which the layer is skipped.
    pub ghost_min_opacity: f64,
    /// Stutter blur below which the stutter layer is skipped.
    pub stutter_min_blur: f64,
    /// Horizontal smear radius of the stutter layer at full blur, in pixels.
    pub stutter_blur_px: f64,
    /// Zoom multiplier of the echo layer.
    pub echo_zoom: f64,
    /// Shear produced per unit sine of x/y rotation.
    pub perspective_shear: f64,
    /// Straight RGBA clear color; `None` leaves the target untouched.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            ghost_zoom: 1.2,
            ghost_min_opacity: 0.05,
            stutter_min_blur: 0.1,
            stutter_blur_px: 12.0,
            echo_zoom: 1.02,
            perspective_shear: 0.35,
            clear_rgba: Some([0, 0, 0, 255]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Pointer/scroll-driven rotation viewer.
pub struct OrbitConfig {
    /// Degrees of rotation per degree of pointer delta.
    pub drag_sensitivity: f64,
    /// Wheel delta to angular impulse (deg/s) factor.
    pub wheel_scale: f64,
    /// Inertia friction rate (per second).
    pub friction: f64,
    /// Upper bound for one viewer step in seconds.
    pub max_dt: f64,
    /// Angular speed below which inertia stops, deg/s.
    pub min_velocity: f64,
    /// Idle auto-rotation speed, deg/s.
    pub auto_rotate_dps: f64,
    /// Lower pitch bound, degrees.
    pub pitch_min: f64,
    /// Upper pitch bound, degrees.
    pub pitch_max: f64,
    /// Crossfade between bracketing frames instead of snapping.
    pub interpolate: bool,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 1.0,
            wheel_scale: 0.5,
            friction: 3.0,
            max_dt: 0.1,
            min_velocity: 0.5,
            auto_rotate_dps: 0.0,
            pitch_min: -90.0,
            pitch_max: 90.0,
            interpolate: true,
        }
    }
}

impl ChoreoConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> ChoreoResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ChoreoError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would break the numerical model.
    pub fn validate(&self) -> ChoreoResult<()> {
        fn finite_nonneg(name: &str, v: f64) -> ChoreoResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(ChoreoError::config(format!(
                    "{name} must be finite and >= 0"
                )));
            }
            Ok(())
        }
        fn unit(name: &str, v: f64) -> ChoreoResult<()> {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(ChoreoError::config(format!("{name} must be in [0, 1]")));
            }
            Ok(())
        }
        fn positive(name: &str, v: f64) -> ChoreoResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(ChoreoError::config(format!(
                    "{name} must be finite and > 0"
                )));
            }
            Ok(())
        }

        let s = &self.smoothing;
        for (name, v) in [
            ("smoothing.bass_rate", s.bass_rate),
            ("smoothing.mid_rate", s.mid_rate),
            ("smoothing.high_rate", s.high_rate),
            ("smoothing.energy_rate", s.energy_rate),
        ] {
            finite_nonneg(name, v)?;
        }

        positive("springs.max_dt", self.springs.max_dt)?;
        for (name, p) in self.springs.all() {
            finite_nonneg(&format!("springs.{name}.stiffness"), p.stiffness)?;
            finite_nonneg(&format!("springs.{name}.damping"), p.damping)?;
            if !p.is_stable_at(self.springs.max_dt) {
                return Err(ChoreoError::config(format!(
                    "springs.{name} is unstable at max_dt={}",
                    self.springs.max_dt
                )));
            }
        }

        let m = &self.motion;
        for (name, v) in [
            ("motion.nod_deg", m.nod_deg),
            ("motion.sway_deg", m.sway_deg),
            ("motion.roll_deg", m.roll_deg),
            ("motion.roll_hz", m.roll_hz),
        ] {
            finite_nonneg(name, v)?;
        }

        let r = &self.rhythm;
        unit("rhythm.bass_threshold", r.bass_threshold)?;
        finite_nonneg("rhythm.refractory_s", r.refractory_s)?;
        finite_nonneg("rhythm.chaos_tilt_deg", r.chaos_tilt_deg)?;
        for phase in Phase::ALL {
            let imp = r.impulses.for_phase(phase);
            let name = phase.as_str();
            if !imp.zoom.is_finite() || !imp.tilt_deg.is_finite() {
                return Err(ChoreoError::config(format!(
                    "rhythm.impulses.{name} zoom/tilt must be finite"
                )));
            }
            positive(&format!("rhythm.impulses.{name}.squash"), imp.squash)?;
            unit(&format!("rhythm.impulses.{name}.ghost"), imp.ghost)?;
            unit(&format!("rhythm.impulses.{name}.echo"), imp.echo)?;
        }

        let st = &self.stutter;
        unit("stutter.mid_threshold", st.mid_threshold)?;
        unit("stutter.high_threshold", st.high_threshold)?;
        finite_nonneg("stutter.refractory_s", st.refractory_s)?;
        unit("stutter.rewind_probability", st.rewind_probability)?;
        finite_nonneg("stutter.skew_max", st.skew_max)?;
        unit("stutter.blur_max", st.blur_max)?;

        let d = &self.decay;
        for (name, v) in [
            ("decay.ghost_rate", d.ghost_rate),
            ("decay.echo_rate", d.echo_rate),
            ("decay.stutter_blur_rate", d.stutter_blur_rate),
            ("decay.skew_rate", d.skew_rate),
            ("decay.squash_rate", d.squash_rate),
            ("decay.tilt_rate", d.tilt_rate),
            ("decay.zoom_rate", d.zoom_rate),
            ("decay.settle_epsilon", d.settle_epsilon),
        ] {
            finite_nonneg(name, v)?;
        }

        let c = &self.compositor;
        positive("compositor.ghost_zoom", c.ghost_zoom)?;
        positive("compositor.echo_zoom", c.echo_zoom)?;
        unit("compositor.ghost_min_opacity", c.ghost_min_opacity)?;
        unit("compositor.stutter_min_blur", c.stutter_min_blur)?;
        finite_nonneg("compositor.stutter_blur_px", c.stutter_blur_px)?;
        finite_nonneg("compositor.perspective_shear", c.perspective_shear)?;

        let o = &self.orbit;
        finite_nonneg("orbit.drag_sensitivity", o.drag_sensitivity)?;
        finite_nonneg("orbit.wheel_scale", o.wheel_scale)?;
        finite_nonneg("orbit.friction", o.friction)?;
        positive("orbit.max_dt", o.max_dt)?;
        finite_nonneg("orbit.min_velocity", o.min_velocity)?;
        if !o.auto_rotate_dps.is_finite() {
            return Err(ChoreoError::config("orbit.auto_rotate_dps must be finite"));
        }
        if !(o.pitch_min.is_finite() && o.pitch_max.is_finite())
            || o.pitch_min < -90.0
            || o.pitch_max > 90.0
            || o.pitch_min > o.pitch_max
        {
            return Err(ChoreoError::config(
                "orbit pitch bounds must satisfy -90 <= pitch_min <= pitch_max <= 90",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
