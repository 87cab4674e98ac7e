use std::sync::Arc;

use crate::{
    assets::store::AssetSource,
    choreography::{
        TickCtx,
        rhythm::{self, BeatEvent, Phase, RhythmState},
        stutter::{self, StutterEvent},
    },
    config::model::ChoreoConfig,
    foundation::{error::ChoreoResult, math::FpsMeter, math::Rng64},
    frames::{
        model::{Frame, PoseId},
        pool::FramePool,
    },
    physics::{
        smoother::{AudioFeatures, BandSmoother},
        spring::clamp_dt,
        state::{PhysicsState, PoseTransform, RotationTargets},
    },
    render::{
        compositor::{self, LayerPlan, RenderStats},
        surface::Surface,
    },
};

/// Driving signal for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickInput {
    /// Monotonic timestamp in seconds.
    pub now_s: f64,
    /// Raw band energies; clamped into `[0, 1]` on entry.
    pub features: AudioFeatures,
}

impl TickInput {
    pub fn new(now_s: f64, features: AudioFeatures) -> Self {
        Self { now_s, features }
    }
}

/// What one tick produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TickStatus {
    pub now_s: f64,
    pub pose_id: Option<PoseId>,
    /// Visible roll of the rig: rotation z plus camera tilt, degrees.
    pub angle_deg: f64,
    pub fps: f64,
    pub phase: Phase,
    pub beat_counter: u8,
    pub scratch_mode: bool,
    pub beat: Option<BeatEvent>,
    pub stutter: Option<StutterEvent>,
    pub smoothed: AudioFeatures,
    pub transform: PoseTransform,
}

/// Tick driver: owns every piece of per-performance state.
///
/// [`Engine::tick`] is the only mutator. Ordering inside a tick is fixed: smoothing, the
/// stutter check (which may claim pose selection), beat registration, rotation targets,
/// decay, then spring integration.
#[derive(Debug)]
pub struct Engine {
    config: ChoreoConfig,
    pool: Arc<FramePool>,
    physics: PhysicsState,
    rhythm: RhythmState,
    smoother: BandSmoother,
    smoothed: AudioFeatures,
    rotation: RotationTargets,
    rng: Rng64,
    fps: FpsMeter,
    last_tick_s: Option<f64>,
    elapsed_s: f64,
}

impl Engine {
    /// Engine with an empty frame set. Fails only on an invalid config.
    pub fn new(config: ChoreoConfig) -> ChoreoResult<Self> {
        config.validate()?;
        Ok(Self {
            pool: Arc::new(FramePool::empty()),
            physics: PhysicsState::new(&config.decay),
            rhythm: RhythmState::default(),
            smoother: BandSmoother::new(&config.smoothing),
            smoothed: AudioFeatures::default(),
            rotation: RotationTargets::default(),
            rng: Rng64::new(config.seed),
            fps: FpsMeter::default(),
            last_tick_s: None,
            elapsed_s: 0.0,
            config,
        })
    }

    pub fn with_frames(
        config: ChoreoConfig,
        frames: impl IntoIterator<Item = Frame>,
    ) -> ChoreoResult<Self> {
        let mut engine = Self::new(config)?;
        engine.replace_frames(frames);
        Ok(engine)
    }

    /// Index a new frame set and swap it in.
    #[tracing::instrument(skip_all)]
    pub fn replace_frames(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.swap_pool(Arc::new(FramePool::build(frames)));
    }

    /// Swap in a pre-built pool; the target pose is re-resolved against it.
    pub fn swap_pool(&mut self, pool: Arc<FramePool>) {
        self.pool = pool;
        self.rhythm.reconcile(&self.pool);
        tracing::debug!(
            frames = self.pool.len(),
            target = ?self.rhythm.target_pose(),
            "frame set replaced"
        );
    }

    /// Advance the performance to `input.now_s`.
    ///
    /// The first tick has `dt = 0`; later steps are clamped to `springs.max_dt`. A tick with a
    /// non-finite timestamp advances nothing and cannot fire a beat or a scratch.
    pub fn tick(&mut self, input: &TickInput) -> TickStatus {
        let now_s = input.now_s;
        let clock_ok = now_s.is_finite();
        let raw_dt = match self.last_tick_s {
            Some(last) if clock_ok => now_s - last,
            _ => 0.0,
        };
        let dt = clamp_dt(raw_dt, self.config.springs.max_dt);
        if clock_ok {
            self.last_tick_s = Some(now_s);
        } else {
            tracing::debug!(now_s, "non-finite timestamp; triggers held");
        }
        self.elapsed_s += dt;
        // The meter sees the wall-clock gap, not the physics step.
        let fps = self.fps.observe(raw_dt);
        self.smoothed = self.smoother.update(input.features, dt);

        let mut ctx = TickCtx {
            now_s,
            pool: self.pool.as_ref(),
            physics: &mut self.physics,
            rng: &mut self.rng,
        };

        let stutter_event = if clock_ok
            && stutter::stutter_due(&self.rhythm, &self.smoothed, now_s, &self.config.stutter)
        {
            Some(stutter::trigger(
                &mut self.rhythm,
                &mut ctx,
                &self.config.stutter,
            ))
        } else {
            None
        };
        self.rhythm.scratch_mode = stutter_event.is_some();

        let beat_event = if clock_ok
            && rhythm::beat_due(&self.rhythm, self.smoothed.bass, now_s, &self.config.rhythm)
        {
            let select = !self.rhythm.scratch_mode;
            Some(rhythm::register_beat(
                &mut self.rhythm,
                &mut ctx,
                &self.config.rhythm,
                select,
            ))
        } else {
            None
        };

        self.rotation = self.rotation_targets();
        self.physics.decay(dt, self.config.decay.settle_epsilon);
        self.physics
            .integrate(self.rotation, &self.config.springs, dt);

        if self
            .rhythm
            .target_pose()
            .is_none_or(|p| !self.pool.contains(p))
        {
            self.rhythm.reconcile(&self.pool);
        }

        let transform = self.physics.snapshot();
        TickStatus {
            now_s,
            pose_id: self.rhythm.target_pose().cloned(),
            angle_deg: transform.rot_z_deg + transform.tilt_deg,
            fps,
            phase: self.rhythm.phase(),
            beat_counter: self.rhythm.beat_counter(),
            scratch_mode: self.rhythm.scratch_mode(),
            beat: beat_event,
            stutter: stutter_event,
            smoothed: self.smoothed,
            transform,
        }
    }

    fn rotation_targets(&self) -> RotationTargets {
        let m = &self.config.motion;
        let s = &self.smoothed;
        let roll = (std::f64::consts::TAU * m.roll_hz * self.elapsed_s).sin();
        RotationTargets {
            x_deg: s.bass * m.nod_deg,
            y_deg: self.rhythm.phase().sway_sign() * s.mid * m.sway_deg,
            z_deg: roll * s.energy * m.roll_deg,
        }
    }

    /// Frame currently on screen, resolved through the default-pose fallback.
    pub fn current_frame(&self) -> Option<&Arc<Frame>> {
        self.pool.resolve(self.rhythm.target_pose())
    }

    pub fn previous_frame(&self) -> Option<&Arc<Frame>> {
        self.rhythm.previous_pose().and_then(|p| self.pool.frame(p))
    }

    /// Layers the next [`Engine::render`] call would draw.
    pub fn plan_layers(&self) -> LayerPlan {
        compositor::plan_layers(
            self.current_frame(),
            self.previous_frame(),
            &self.physics.snapshot(),
            &self.config.compositor,
        )
    }

    /// Composite the current state into `surface`.
    #[tracing::instrument(skip_all, fields(width = surface.width, height = surface.height))]
    pub fn render(&self, assets: &dyn AssetSource, surface: &mut Surface) -> RenderStats {
        let plan = self.plan_layers();
        compositor::composite(
            &plan,
            &self.physics.snapshot(),
            assets,
            surface,
            &self.config.compositor,
        )
    }

    pub fn config(&self) -> &ChoreoConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<FramePool> {
        &self.pool
    }

    pub fn physics(&self) -> &PhysicsState {
        &self.physics
    }

    pub fn rhythm(&self) -> &RhythmState {
        &self.rhythm
    }

    /// Smoothed band energies after the last tick.
    pub fn smoothed(&self) -> AudioFeatures {
        self.smoothed
    }

    pub fn rotation(&self) -> RotationTargets {
        self.rotation
    }

    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    pub fn transform(&self) -> PoseTransform {
        self.physics.snapshot()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreography/engine.rs"]
mod tests;
