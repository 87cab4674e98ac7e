use std::sync::Arc;

use crate::{
    config::model::OrbitConfig,
    foundation::core::normalize_deg,
    frames::{
        model::{Frame, PoseId},
        pool::{FramePool, PoolKey},
    },
    orbit::quantize::{Bracket, OrbitFilter, bracket, nearest_pitch_row, quantize},
    physics::{decay::DecayCurve, spring::clamp_dt},
};

const BLEND_EPS: f64 = 1e-6;

/// Angle/pitch state of the rotation viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct OrbitalPhysicsState {
    /// Always in `[0, 360)`.
    pub angle_deg: f64,
    /// Clamped to the configured pitch bounds.
    pub pitch_deg: f64,
    /// Degrees per second.
    pub angular_velocity: f64,
    /// Degrees per second.
    pub pitch_velocity: f64,
    pub dragging: bool,
}

/// What the viewer shows.
#[derive(Clone, Debug)]
pub enum OrbitView {
    Single(Arc<Frame>),
    /// Crossfade between two neighbouring angles.
    Blend(Bracket),
}

impl OrbitView {
    /// The dominant frame: the single frame, or the nearer side of a blend.
    pub fn primary(&self) -> &Arc<Frame> {
        match self {
            Self::Single(f) => f,
            Self::Blend(b) if b.t > 0.5 => &b.b,
            Self::Blend(b) => &b.a,
        }
    }
}

/// Drag/scroll-driven turnaround over the orbit frames of a pool.
#[derive(Debug)]
pub struct OrbitViewer {
    config: OrbitConfig,
    filter: OrbitFilter,
    pool: Arc<FramePool>,
    state: OrbitalPhysicsState,
    pending_drag: (f64, f64),
    view: Option<OrbitView>,
}

impl OrbitViewer {
    pub fn new(config: OrbitConfig, pool: Arc<FramePool>) -> Self {
        let mut viewer = Self {
            config,
            filter: OrbitFilter::default(),
            pool,
            state: OrbitalPhysicsState::default(),
            pending_drag: (0.0, 0.0),
            view: None,
        };
        viewer.refresh();
        viewer
    }

    pub fn with_filter(mut self, filter: OrbitFilter) -> Self {
        self.filter = filter;
        self.refresh();
        self
    }

    /// Swap the frame set. The current view stays up until the new set yields a selection.
    pub fn swap_pool(&mut self, pool: Arc<FramePool>) {
        self.pool = pool;
        self.refresh();
    }

    pub fn drag_start(&mut self) {
        self.state.dragging = true;
        self.state.angular_velocity = 0.0;
        self.state.pitch_velocity = 0.0;
        self.pending_drag = (0.0, 0.0);
    }

    /// Move by a pointer delta already expressed in degrees.
    pub fn drag_by(&mut self, dx_deg: f64, dy_deg: f64) {
        if !(dx_deg.is_finite() && dy_deg.is_finite()) {
            return;
        }
        let dx = dx_deg * self.config.drag_sensitivity;
        let dy = dy_deg * self.config.drag_sensitivity;
        self.state.angle_deg = normalize_deg(self.state.angle_deg + dx);
        self.state.pitch_deg = self.clamp_pitch(self.state.pitch_deg + dy);
        self.pending_drag.0 += dx;
        self.pending_drag.1 += dy;
        self.refresh();
    }

    /// Release; the last drag speed carries on as inertia.
    pub fn drag_end(&mut self) {
        self.state.dragging = false;
    }

    /// Scroll input becomes angular impulse.
    pub fn wheel(&mut self, delta: f64) {
        if delta.is_finite() {
            self.state.angular_velocity += delta * self.config.wheel_scale;
        }
    }

    /// Jump to an angle and pitch, dropping any motion.
    pub fn set_orientation(&mut self, angle_deg: f64, pitch_deg: f64) {
        self.state.angle_deg = normalize_deg(angle_deg);
        self.state.pitch_deg = self.clamp_pitch(pitch_deg);
        self.state.angular_velocity = 0.0;
        self.state.pitch_velocity = 0.0;
        self.refresh();
    }

    pub fn tick(&mut self, dt: f64) -> &OrbitalPhysicsState {
        let dt = clamp_dt(dt, self.config.max_dt);
        let s = &mut self.state;

        if s.dragging {
            if dt > 0.0 {
                s.angular_velocity = self.pending_drag.0 / dt;
                s.pitch_velocity = self.pending_drag.1 / dt;
                self.pending_drag = (0.0, 0.0);
            }
        } else {
            let friction = DecayCurve::Exponential {
                rate: self.config.friction,
            };
            s.angle_deg = normalize_deg(s.angle_deg + s.angular_velocity * dt);
            let pitch = s.pitch_deg + s.pitch_velocity * dt;
            s.angular_velocity = friction.apply(s.angular_velocity, 0.0, dt);
            s.pitch_velocity = friction.apply(s.pitch_velocity, 0.0, dt);
            if s.angular_velocity.abs() < self.config.min_velocity {
                s.angular_velocity = 0.0;
            }
            if s.pitch_velocity.abs() < self.config.min_velocity {
                s.pitch_velocity = 0.0;
            }

            let clamped = pitch.clamp(self.config.pitch_min, self.config.pitch_max);
            if clamped != pitch {
                s.pitch_velocity = 0.0;
            }
            s.pitch_deg = clamped;

            if s.angular_velocity == 0.0 {
                s.angle_deg = normalize_deg(s.angle_deg + self.config.auto_rotate_dps * dt);
            }
        }

        self.refresh();
        &self.state
    }

    fn clamp_pitch(&self, pitch: f64) -> f64 {
        pitch.clamp(self.config.pitch_min, self.config.pitch_max)
    }

    fn refresh(&mut self) {
        if let Some(view) = self.resolve() {
            self.view = Some(view);
        }
    }

    fn resolve(&self) -> Option<OrbitView> {
        let candidates: Vec<Arc<Frame>> = self
            .pool
            .get(PoolKey::Orbit)
            .iter()
            .filter(|f| self.filter.accepts(f))
            .cloned()
            .collect();
        let row = nearest_pitch_row(self.state.pitch_deg, &candidates);
        let angle = self.state.angle_deg;

        if self.config.interpolate
            && let Some(b) = bracket(angle, &row)
        {
            return Some(if b.t <= BLEND_EPS {
                OrbitView::Single(b.a)
            } else if b.t >= 1.0 - BLEND_EPS {
                OrbitView::Single(b.b)
            } else {
                OrbitView::Blend(b)
            });
        }
        quantize(angle, &row, &OrbitFilter::ANY).map(OrbitView::Single)
    }

    pub fn state(&self) -> &OrbitalPhysicsState {
        &self.state
    }

    /// Current view; holds the last good selection when the pool has nothing to show.
    pub fn view(&self) -> Option<&OrbitView> {
        self.view.as_ref()
    }

    pub fn primary_pose(&self) -> Option<&PoseId> {
        self.view.as_ref().map(|v| &v.primary().pose_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orbit/viewer.rs"]
mod tests;
