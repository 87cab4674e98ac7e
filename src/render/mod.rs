pub mod blend;
pub mod blur;
pub mod compositor;
pub mod surface;
pub mod transform;
