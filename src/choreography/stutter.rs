use crate::{
    choreography::{TickCtx, rhythm::RhythmState},
    config::model::StutterConfig,
    frames::{
        model::{EnergyTier, PoseId},
        pool::PoolKey,
    },
    physics::smoother::AudioFeatures,
};

/// Flavor of a scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScratchKind {
    /// Current and previous pose exchanged, with a skew kick and full stutter blur.
    Rewind,
    /// Jump to a random high-energy or close-in pose.
    Jump,
}

/// Record of one scratch.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StutterEvent {
    pub at_s: f64,
    pub kind: ScratchKind,
    /// Target pose after the scratch. Unchanged when the scratch had nothing to jump to.
    pub pose: Option<PoseId>,
}

/// Mid or high band over its threshold, outside the refractory window.
pub fn stutter_due(
    state: &RhythmState,
    smoothed: &AudioFeatures,
    now_s: f64,
    cfg: &StutterConfig,
) -> bool {
    (smoothed.mid > cfg.mid_threshold || smoothed.high > cfg.high_threshold)
        && state
            .last_stutter_s
            .is_none_or(|last| now_s - last >= cfg.refractory_s)
}

pub(crate) fn trigger(
    state: &mut RhythmState,
    ctx: &mut TickCtx<'_>,
    cfg: &StutterConfig,
) -> StutterEvent {
    state.last_stutter_s = Some(ctx.now_s);

    let kind = if ctx.rng.chance(cfg.rewind_probability) {
        state.swap_poses();
        let skew = ctx.rng.range_f64(-cfg.skew_max, cfg.skew_max);
        ctx.physics.kick_skew(skew);
        ctx.physics.kick_stutter_blur(cfg.blur_max);
        ScratchKind::Rewind
    } else {
        let cands = ctx
            .pool
            .union(PoolKey::Tier(EnergyTier::High), PoolKey::Macro);
        if cands.is_empty() {
            tracing::debug!("no high/macro frames; jump scratch holds pose");
        } else {
            let pick = &cands[ctx.rng.index(cands.len())];
            state.set_target(pick.pose_id.clone());
        }
        ScratchKind::Jump
    };

    let event = StutterEvent {
        at_s: ctx.now_s,
        kind,
        pose: state.target_pose.clone(),
    };
    tracing::debug!(at_s = ctx.now_s, kind = ?kind, pose = ?event.pose, "scratch");
    event
}

#[cfg(test)]
#[path = "../../tests/unit/choreography/stutter.rs"]
mod tests;
