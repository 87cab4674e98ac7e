//! choreo drives a small library of still pose frames from audio or rotation input.
//!
//! Nothing is morphed: motion comes from when a frame is picked plus springy affine
//! transforms and alpha blending on top of it.
//!
//! - Build a [`ChoreoConfig`] (or take the defaults) and an [`Engine`] over a frame set
//! - Feed one [`TickInput`] per display frame and read back the [`TickStatus`]
//! - Composite the current state into a [`Surface`] from any [`AssetSource`]
//!
//! The rotation viewer ([`OrbitViewer`]) runs independently over the same frame pool.
#![forbid(unsafe_code)]

mod foundation;

/// Decoded images and the lookup the compositor draws from.
pub mod assets;
/// Rhythm phases, scratches and the per-tick driver.
pub mod choreography;
/// Serde-backed tuning surface.
pub mod config;
/// Frame tags and the category index over a frame set.
pub mod frames;
/// Angle quantization, bracketing and the drag/scroll viewer.
pub mod orbit;
/// Springs, decays and band smoothing.
pub mod physics;
/// CPU layer compositing into premultiplied RGBA8.
pub mod render;

pub use crate::foundation::core::{
    Affine, Canvas, FULL_TURN_DEG, Point, Rect, Rgba8Premul, Vec2, circular_distance_deg,
    forward_delta_deg, normalize_deg, shortest_delta_deg,
};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};
pub use crate::foundation::math::{FpsMeter, Rng64};

pub use crate::assets::decode::{decode_image, load_image_file};
pub use crate::assets::store::{AssetSource, AssetStore, PreparedImage};
pub use crate::choreography::engine::{Engine, TickInput, TickStatus};
pub use crate::choreography::rhythm::{BEAT_CYCLE, BeatEvent, Phase, RhythmState};
pub use crate::choreography::stutter::{ScratchKind, StutterEvent};
pub use crate::config::model::ChoreoConfig;
pub use crate::frames::model::{
    Direction, EnergyTier, Frame, ImageKey, MacroRegion, PoseId, Role, VirtualZoom,
};
pub use crate::frames::pool::{FramePool, PoolKey};
pub use crate::orbit::quantize::{Bracket, OrbitFilter, bracket, quantize};
pub use crate::orbit::viewer::{OrbitView, OrbitViewer, OrbitalPhysicsState};
pub use crate::physics::smoother::AudioFeatures;
pub use crate::physics::state::{CameraImpulse, PhysicsState, PoseTransform};
pub use crate::render::blend::BlendMode;
pub use crate::render::compositor::{LayerDraw, LayerKind, LayerPlan, RenderStats, render_orbit_view};
pub use crate::render::surface::Surface;
