//! Error types for x-ray entities and the collection.

use lungair_core::CoreError;
use lungair_model::ModelError;
use thiserror::Error;

/// Main error type for x-ray operations.
#[derive(Error, Debug)]
pub enum XrayError {
    /// An x-ray with this name is already in the collection.
    #[error("Duplicate x-ray name: '{0}'")]
    DuplicateName(String),

    /// No x-ray with this name is in the collection.
    #[error("X-ray not found: '{0}'")]
    NotFound(String),

    /// An operation needs a selected x-ray and none is selected.
    #[error("No x-ray is selected")]
    NoSelection,

    /// Orientation or geometry failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Inference failure.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for x-ray operations.
pub type Result<T> = std::result::Result<T, XrayError>;

impl XrayError {
    /// Create a duplicate-name error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(XrayError::duplicate("cxr1").to_string(), "Duplicate x-ray name: 'cxr1'");
        assert_eq!(XrayError::NoSelection.to_string(), "No x-ray is selected");

        let err: XrayError = CoreError::orientation("no left axis").into();
        assert_eq!(err.to_string(), "Orientation error: no left axis");
    }
}
