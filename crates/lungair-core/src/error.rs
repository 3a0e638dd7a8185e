//! Error types for orientation and coordinate-frame operations.

use thiserror::Error;
use crate::transform::Frame;

/// Main error type for the imaging core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An image source is not in a state where a canonical array can be trusted.
    #[error("Precheck failed for '{source_name}': {reason}")]
    Precheck {
        source_name: String,
        reason: String,
    },

    /// No array axis (or the same axis for both) matched the left/inferior directions.
    #[error("Orientation error: {0}")]
    Orientation(String),

    /// The slice axis does not have extent 1.
    #[error("Size error: axis {axis} has extent {extent}, expected a single slice")]
    Size { axis: usize, extent: usize },

    /// A direction matrix is not invertible or not orthonormal.
    #[error("Singular transform: {0}")]
    SingularTransform(String),

    /// Two frame transforms were composed whose frames do not line up.
    #[error("Frame mismatch: cannot follow a transform into {left:?} with one from {right:?}")]
    FrameMismatch { left: Frame, right: Frame },

    /// Multi-component image data with an unexpected channel count.
    #[error("Unsupported scalar components: {0} (expected 1 or 3)")]
    UnsupportedComponents(usize),

    /// Shape mismatch.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a precheck error.
    pub fn precheck(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precheck {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an orientation error.
    pub fn orientation(msg: impl Into<String>) -> Self {
        Self::Orientation(msg.into())
    }

    /// Create a singular transform error.
    pub fn singular(msg: impl Into<String>) -> Self {
        Self::SingularTransform(msg.into())
    }
}
