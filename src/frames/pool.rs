use std::{borrow::Cow, collections::HashMap, sync::Arc};

use crate::{
    foundation::core::normalize_deg,
    frames::model::{Direction, EnergyTier, Frame, PoseId, Role},
};

/// Category under which frames are indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolKey {
    /// Choreography frames of one energy tier.
    Tier(EnergyTier),
    /// Choreography frames of one tier facing one direction.
    TierDirection(EnergyTier, Direction),
    /// Every frame carrying a role.
    Role(Role),
    /// Close-in material, any tier.
    Macro,
    /// Turnaround frames with an angle, ordered by normalized angle.
    Orbit,
}

/// Immutable category index over one frame set.
///
/// A pool is built wholesale and then only read. Frame-set replacement builds a new pool
/// and swaps the `Arc` the engine holds, so readers never see a half-filled index.
#[derive(Clone, Debug, Default)]
pub struct FramePool {
    frames: Vec<Arc<Frame>>,
    by_key: HashMap<PoolKey, Vec<Arc<Frame>>>,
    by_id: HashMap<PoseId, usize>,
    default_pose: Option<PoseId>,
}

impl FramePool {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index `frames`. Later frames reusing an earlier pose id are dropped.
    pub fn build(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self::from_shared(frames.into_iter().map(Arc::new))
    }

    pub fn from_shared(frames: impl IntoIterator<Item = Arc<Frame>>) -> Self {
        let mut out = Self::default();

        for frame in frames {
            if out.by_id.contains_key(&frame.pose_id) {
                tracing::warn!(pose = %frame.pose_id, "duplicate pose id dropped from pool");
                continue;
            }
            out.by_id.insert(frame.pose_id.clone(), out.frames.len());

            out.push(PoolKey::Role(frame.role), &frame);
            if frame.is_macro() {
                out.push(PoolKey::Macro, &frame);
            }
            if frame.is_choreography() {
                out.push(PoolKey::Tier(frame.tier), &frame);
                out.push(PoolKey::TierDirection(frame.tier, frame.direction), &frame);
            }
            if frame.angle.is_some_and(f64::is_finite) {
                out.push(PoolKey::Orbit, &frame);
            }
            out.frames.push(frame);
        }

        if let Some(orbit) = out.by_key.get_mut(&PoolKey::Orbit) {
            // Stable sort keeps pool order among equal angles.
            orbit.sort_by(|a, b| {
                let a = normalize_deg(a.angle.unwrap_or_default());
                let b = normalize_deg(b.angle.unwrap_or_default());
                a.total_cmp(&b)
            });
        }

        out.default_pose = out
            .frames
            .iter()
            .find(|f| f.role == Role::Base)
            .or_else(|| out.frames.first())
            .map(|f| f.pose_id.clone());

        tracing::debug!(
            frames = out.frames.len(),
            categories = out.by_key.len(),
            "frame pool built"
        );
        out
    }

    fn push(&mut self, key: PoolKey, frame: &Arc<Frame>) {
        self.by_key.entry(key).or_default().push(Arc::clone(frame));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames in insertion order.
    pub fn frames(&self) -> &[Arc<Frame>] {
        &self.frames
    }

    /// Frames under `key`, in pool order. Unknown categories are empty.
    pub fn get(&self, key: PoolKey) -> &[Arc<Frame>] {
        self.by_key.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concatenation of two categories without duplicate poses, `a` first.
    pub fn union(&self, a: PoolKey, b: PoolKey) -> Cow<'_, [Arc<Frame>]> {
        let (fa, fb) = (self.get(a), self.get(b));
        if fb.is_empty() {
            return Cow::Borrowed(fa);
        }
        if fa.is_empty() {
            return Cow::Borrowed(fb);
        }
        let mut out: Vec<Arc<Frame>> = fa.to_vec();
        for f in fb {
            if !out.iter().any(|g| g.pose_id == f.pose_id) {
                out.push(Arc::clone(f));
            }
        }
        Cow::Owned(out)
    }

    pub fn frame(&self, id: &PoseId) -> Option<&Arc<Frame>> {
        self.by_id.get(id).and_then(|&i| self.frames.get(i))
    }

    pub fn contains(&self, id: &PoseId) -> bool {
        self.by_id.contains_key(id)
    }

    /// First `Base` frame, else the first frame.
    pub fn default_pose(&self) -> Option<&PoseId> {
        self.default_pose.as_ref()
    }

    /// Resolve `id`, falling back to the default pose when it is absent or unknown.
    pub fn resolve(&self, id: Option<&PoseId>) -> Option<&Arc<Frame>> {
        id.and_then(|id| self.frame(id))
            .or_else(|| self.default_pose().and_then(|d| self.frame(d)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/pool.rs"]
mod tests;
