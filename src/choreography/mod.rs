pub mod engine;
pub mod rhythm;
pub mod stutter;

use crate::{foundation::math::Rng64, frames::pool::FramePool, physics::state::PhysicsState};

/// Borrowed view of engine state handed to the rhythm and stutter steps of one tick.
pub(crate) struct TickCtx<'a> {
    pub now_s: f64,
    pub pool: &'a FramePool,
    pub physics: &'a mut PhysicsState,
    pub rng: &'a mut Rng64,
}
