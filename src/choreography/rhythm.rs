use std::{borrow::Cow, sync::Arc};

use crate::{
    choreography::TickCtx,
    config::model::RhythmConfig,
    foundation::math::Rng64,
    frames::{
        model::{Direction, EnergyTier, Frame, PoseId},
        pool::{FramePool, PoolKey},
    },
    physics::state::CameraImpulse,
};

/// Steps in one rhythm cycle.
pub const BEAT_CYCLE: u8 = 16;

/// Section of the 16-step cycle; decides pool and camera impulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warmup,
    SwingLeft,
    SwingRight,
    Drop,
    Chaos,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Warmup,
        Phase::SwingLeft,
        Phase::SwingRight,
        Phase::Drop,
        Phase::Chaos,
    ];

    /// Phase owning `step` (taken modulo the cycle length).
    pub fn for_step(step: u8) -> Self {
        match step % BEAT_CYCLE {
            0..=3 => Self::Warmup,
            4..=7 => Self::SwingLeft,
            8..=11 => Self::SwingRight,
            12..=13 => Self::Drop,
            _ => Self::Chaos,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::SwingLeft => "swing_left",
            Self::SwingRight => "swing_right",
            Self::Drop => "drop",
            Self::Chaos => "chaos",
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::SwingLeft => Some(Direction::Left),
            Self::SwingRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// -1 swinging left, +1 swinging right, 0 otherwise.
    pub fn sway_sign(self) -> f64 {
        match self.direction() {
            Some(Direction::Left) => -1.0,
            Some(Direction::Right) => 1.0,
            _ => 0.0,
        }
    }
}

/// Beat/phase state. Only the engine tick mutates it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RhythmState {
    beat_counter: u8,
    phase: Phase,
    pub(crate) last_beat_s: Option<f64>,
    pub(crate) last_stutter_s: Option<f64>,
    pub(crate) target_pose: Option<PoseId>,
    pub(crate) previous_pose: Option<PoseId>,
    pub(crate) scratch_mode: bool,
}

impl Default for RhythmState {
    fn default() -> Self {
        Self {
            beat_counter: 0,
            phase: Phase::Warmup,
            last_beat_s: None,
            last_stutter_s: None,
            target_pose: None,
            previous_pose: None,
            scratch_mode: false,
        }
    }
}

impl RhythmState {
    /// Always in `[0, 16)`.
    pub fn beat_counter(&self) -> u8 {
        self.beat_counter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target_pose(&self) -> Option<&PoseId> {
        self.target_pose.as_ref()
    }

    pub fn previous_pose(&self) -> Option<&PoseId> {
        self.previous_pose.as_ref()
    }

    pub fn last_beat_s(&self) -> Option<f64> {
        self.last_beat_s
    }

    pub fn last_stutter_s(&self) -> Option<f64> {
        self.last_stutter_s
    }

    /// Whether a scratch overrode selection on the last tick.
    pub fn scratch_mode(&self) -> bool {
        self.scratch_mode
    }

    fn advance(&mut self) -> u8 {
        self.beat_counter = (self.beat_counter + 1) % BEAT_CYCLE;
        self.phase = Phase::for_step(self.beat_counter);
        self.beat_counter
    }

    pub(crate) fn set_target(&mut self, pose: PoseId) {
        self.previous_pose = self.target_pose.replace(pose);
    }

    /// Rewind: exchange current and previous pose. No-op without a previous pose.
    pub(crate) fn swap_poses(&mut self) {
        if self.previous_pose.is_some() {
            std::mem::swap(&mut self.target_pose, &mut self.previous_pose);
        }
    }

    /// Re-anchor pose references after a frame-set swap.
    pub(crate) fn reconcile(&mut self, pool: &FramePool) {
        if self.previous_pose.as_ref().is_some_and(|p| !pool.contains(p)) {
            self.previous_pose = None;
        }
        if !self.target_pose.as_ref().is_some_and(|p| pool.contains(p)) {
            self.target_pose = pool.default_pose().cloned();
        }
    }
}

/// Record of one registered beat.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BeatEvent {
    pub at_s: f64,
    pub beat_counter: u8,
    pub phase: Phase,
    /// Pose chosen on this beat; `None` when selection was suppressed or every pool was empty.
    pub pose: Option<PoseId>,
    /// Re-draws spent avoiding the current pose.
    pub resamples: u32,
    /// The pick still equals the previous pose after all re-draws.
    pub repeated: bool,
    /// A scratch owned this tick's selection.
    pub suppressed: bool,
}

/// Outcome of [`pick_avoiding`].
#[derive(Clone, Debug)]
pub struct Pick {
    pub frame: Arc<Frame>,
    pub resamples: u32,
    pub repeated: bool,
}

/// Onset gate: smoothed bass above threshold and the refractory window elapsed.
pub fn beat_due(state: &RhythmState, bass: f64, now_s: f64, cfg: &RhythmConfig) -> bool {
    bass > cfg.bass_threshold
        && state
            .last_beat_s
            .is_none_or(|last| now_s - last >= cfg.refractory_s)
}

/// Candidate frames for `phase`, with the mid → low fallback when the phase pool is empty.
pub fn candidates(pool: &FramePool, phase: Phase) -> Cow<'_, [Arc<Frame>]> {
    let primary = match phase {
        Phase::Warmup => Cow::Borrowed(pool.get(PoolKey::Tier(EnergyTier::Low))),
        Phase::SwingLeft | Phase::SwingRight => {
            let dir = phase.direction().unwrap_or_default();
            let filtered = pool.get(PoolKey::TierDirection(EnergyTier::Mid, dir));
            if filtered.is_empty() {
                Cow::Borrowed(pool.get(PoolKey::Tier(EnergyTier::Mid)))
            } else {
                Cow::Borrowed(filtered)
            }
        }
        Phase::Drop => Cow::Borrowed(pool.get(PoolKey::Tier(EnergyTier::High))),
        Phase::Chaos => pool.union(PoolKey::Tier(EnergyTier::High), PoolKey::Macro),
    };
    if !primary.is_empty() {
        return primary;
    }
    [EnergyTier::Mid, EnergyTier::Low]
        .into_iter()
        .map(|tier| pool.get(PoolKey::Tier(tier)))
        .find(|c| !c.is_empty())
        .map_or(Cow::Borrowed(&[][..]), Cow::Borrowed)
}

/// Uniform pick, re-drawn up to `max_resamples` times while it equals `avoid`.
pub fn pick_avoiding(
    candidates: &[Arc<Frame>],
    avoid: Option<&PoseId>,
    max_resamples: u32,
    rng: &mut Rng64,
) -> Option<Pick> {
    if candidates.is_empty() {
        return None;
    }
    let mut pick = &candidates[rng.index(candidates.len())];
    let mut resamples = 0;
    if let Some(avoid) = avoid {
        while pick.pose_id == *avoid && resamples < max_resamples {
            pick = &candidates[rng.index(candidates.len())];
            resamples += 1;
        }
    }
    Some(Pick {
        frame: Arc::clone(pick),
        resamples,
        repeated: avoid.is_some_and(|a| pick.pose_id == *a),
    })
}

fn impulse_for(phase: Phase, cfg: &RhythmConfig, rng: &mut Rng64) -> CameraImpulse {
    let mut impulse = cfg.impulses.for_phase(phase);
    if phase == Phase::Chaos {
        impulse.tilt_deg = rng.range_f64(-cfg.chaos_tilt_deg, cfg.chaos_tilt_deg);
    }
    impulse
}

/// Advance the cycle, pick the next pose (unless `select` is false) and kick the camera.
pub(crate) fn register_beat(
    state: &mut RhythmState,
    ctx: &mut TickCtx<'_>,
    cfg: &RhythmConfig,
    select: bool,
) -> BeatEvent {
    state.last_beat_s = Some(ctx.now_s);
    let beat_counter = state.advance();
    let phase = state.phase;

    let mut event = BeatEvent {
        at_s: ctx.now_s,
        beat_counter,
        phase,
        pose: None,
        resamples: 0,
        repeated: false,
        suppressed: !select,
    };

    if select {
        let pool = ctx.pool;
        let cands = candidates(pool, phase);
        let avoid = if phase == Phase::Chaos {
            None
        } else {
            state.target_pose.as_ref()
        };
        match pick_avoiding(&cands, avoid, cfg.max_resample_attempts, ctx.rng) {
            Some(pick) => {
                event.resamples = pick.resamples;
                event.repeated = pick.repeated;
                event.pose = Some(pick.frame.pose_id.clone());
                state.set_target(pick.frame.pose_id.clone());
            }
            None => tracing::debug!(phase = phase.as_str(), "all pools empty; holding pose"),
        }
    }

    ctx.physics.apply_impulse(&impulse_for(phase, cfg, ctx.rng));

    tracing::debug!(
        at_s = ctx.now_s,
        beat = beat_counter,
        phase = phase.as_str(),
        pose = ?event.pose,
        suppressed = event.suppressed,
        "beat registered"
    );
    event
}

#[cfg(test)]
#[path = "../../tests/unit/choreography/rhythm.rs"]
mod tests;
