use std::fmt;

/// Opaque pose identifier; only ever used as a lookup handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PoseId(pub String);

impl PoseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of the backing image in an [`crate::AssetSource`]. Mirrored frames usually share
/// the key of their source frame.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageKey(pub String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyTier {
    Low,
    Mid,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Center,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Neutral reference pose; preferred default.
    Base,
    /// Regular choreography pose.
    #[default]
    Dance,
    /// Close-in shot of a body region.
    Closeup,
    /// Detail insert (props, textures).
    Detail,
    /// Turnaround frame at a known viewing angle.
    Orbit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroRegion {
    Face,
    Hands,
    Feet,
    Torso,
}

/// Close-in produced by scaling a regular frame rather than a dedicated render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VirtualZoom {
    /// Extra zoom factor applied on top of the camera zoom.
    pub zoom: f64,
    /// Vertical offset in image pixels applied before scaling.
    #[serde(default)]
    pub offset_y: f64,
}

/// One pre-rendered still and its selection tags.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub pose_id: PoseId,
    pub image: ImageKey,
    pub tier: EnergyTier,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_zoom: Option<VirtualZoom>,
    #[serde(default)]
    pub mirrored: bool,
    /// Viewing angle in degrees for turnaround frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Camera pitch in degrees for turnaround frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_region: Option<MacroRegion>,
}

impl Frame {
    /// A centered dance frame whose image key equals its pose id.
    pub fn new(pose_id: impl Into<String>, tier: EnergyTier) -> Self {
        let pose_id = pose_id.into();
        Self {
            image: ImageKey::new(pose_id.clone()),
            pose_id: PoseId(pose_id),
            tier,
            role: Role::Dance,
            direction: Direction::Center,
            virtual_zoom: None,
            mirrored: false,
            angle: None,
            pitch: None,
            macro_region: None,
        }
    }

    /// A turnaround frame at `angle_deg`.
    pub fn orbit(pose_id: impl Into<String>, angle_deg: f64) -> Self {
        Self::new(pose_id, EnergyTier::Low)
            .with_role(Role::Orbit)
            .with_angle(angle_deg)
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = ImageKey::new(image);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle = Some(angle_deg);
        self
    }

    pub fn with_pitch(mut self, pitch_deg: f64) -> Self {
        self.pitch = Some(pitch_deg);
        self
    }

    pub fn with_macro_region(mut self, region: MacroRegion) -> Self {
        self.macro_region = Some(region);
        self
    }

    pub fn with_virtual_zoom(mut self, zoom: f64, offset_y: f64) -> Self {
        self.virtual_zoom = Some(VirtualZoom { zoom, offset_y });
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// Close-in material: closeup/detail roles, tagged body regions and virtual zooms.
    pub fn is_macro(&self) -> bool {
        matches!(self.role, Role::Closeup | Role::Detail)
            || self.macro_region.is_some()
            || self.virtual_zoom.is_some()
    }

    /// Frames eligible for the energy-tier pools.
    pub fn is_choreography(&self) -> bool {
        matches!(self.role, Role::Base | Role::Dance) && !self.is_macro()
    }
}
