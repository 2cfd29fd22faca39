//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context to fix the problem at the call site.

use thiserror::Error;

/// Result type alias for quantization-aware training operations.
pub type Result<T> = std::result::Result<T, QatError>;

/// Errors raised by quantizers and the quantize layer.
#[derive(Error, Debug)]
pub enum QatError {
    /// No usable quantizer was supplied to a layer.
    #[error("Invalid quantizer: {message}\n  → Pass a quantizer such as LastValueQuantizer or MovingAverageQuantizer")]
    InvalidQuantizer { message: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    InvalidConfig {
        field: String,
        message: String,
        suggestion: String,
    },

    /// Layer state was requested before `build` ran.
    #[error("Layer '{layer}' has not been built\n  → Call build() or run a forward pass first")]
    NotBuilt { layer: String },

    /// Input shape differs from the shape the layer was built with.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}\n  → Feed inputs with the shape used to build the layer")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A quantization range is unusable.
    #[error("Invalid quantization range [{min}, {max}]\n  → Range bounds must be finite with min <= max")]
    InvalidRange { min: f32, max: f32 },

    /// A restored weight does not line up with the layer's weights.
    #[error("Weight mismatch: expected {expected}, got {actual}")]
    WeightMismatch {
        expected: String,
        actual: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl QatError {
    /// Create an invalid-config error.
    pub fn config(
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantizer { .. }
                | Self::InvalidConfig { .. }
                | Self::NotBuilt { .. }
                | Self::ShapeMismatch { .. }
                | Self::WeightMismatch { .. }
                | Self::Serialization { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuantizer { .. } => "Q001",
            Self::InvalidConfig { .. } => "Q002",
            Self::NotBuilt { .. } => "Q010",
            Self::ShapeMismatch { .. } => "Q011",
            Self::InvalidRange { .. } => "Q020",
            Self::WeightMismatch { .. } => "Q030",
            Self::Serialization { .. } => "Q040",
        }
    }
}

impl From<serde_json::Error> for QatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
