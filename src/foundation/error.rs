/// Convenience result type used across choreo.
pub type ChoreoResult<T> = Result<T, ChoreoError>;

/// Error taxonomy for the fallible edges of the engine.
///
/// The per-tick choreography path never fails: missing images, empty pools and degenerate
/// interpolation all degrade to "hold the last good frame". Errors only come from
/// configuration, asset ingest and render-target setup.
#[derive(thiserror::Error, Debug)]
pub enum ChoreoError {
    /// Invalid caller-provided data (frames, surfaces, images).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rejected configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Asset ingest failure (decode, IO).
    #[error("asset error: {0}")]
    Asset(String),

    /// Render target or rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChoreoError {
    /// Build a [`ChoreoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChoreoError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ChoreoError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ChoreoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
