/// Convenience result type used across kickshot.
pub type KickshotResult<T> = Result<T, KickshotError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KickshotError {
    /// The host could not provide a drawing context. Fatal for the surface it was raised on.
    #[error("surface has no drawing context")]
    MissingSurfaceContext,

    /// The logical surface size is not drawable yet (zero, negative or non-finite).
    ///
    /// Transient: a later resize is expected to fix it.
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Logical width at the time of the draw.
        width: f64,
        /// Logical height at the time of the draw.
        height: f64,
    },

    /// Invalid user-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by a raster backend.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while streaming frames into an encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KickshotError {
    /// Build a [`KickshotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KickshotError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KickshotError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`KickshotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`KickshotError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: f64, height: f64) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// `true` for errors the animation loop recovers from by skipping a single frame.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
