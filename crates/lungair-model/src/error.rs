//! Error types for segmentation inference.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for inference backends.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The backend produced no usable result.
    #[error("Inference error: {0}")]
    Inference(String),

    /// The input image cannot be fed to the model.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No model is available for the requested backend.
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    /// The deploy process could not be started or exited unsuccessfully.
    #[error("Process '{program}' failed ({status}): {stderr}")]
    Process {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encode/decode error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error reading or writing a `.npy` array.
    #[error("Npy error: {0}")]
    Npy(String),

    /// The mask does not have the structure post-processing expects.
    #[error("Post-processing error: {0}")]
    PostProcess(String),
}

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create an inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a model-not-loaded error.
    pub fn not_loaded(msg: impl Into<String>) -> Self {
        Self::ModelNotLoaded(msg.into())
    }

    /// Create a post-processing error.
    pub fn post_process(msg: impl Into<String>) -> Self {
        Self::PostProcess(msg.into())
    }
}

impl From<ndarray_npy::ReadNpyError> for ModelError {
    fn from(err: ndarray_npy::ReadNpyError) -> Self {
        Self::Npy(err.to_string())
    }
}

impl From<ndarray_npy::WriteNpyError> for ModelError {
    fn from(err: ndarray_npy::WriteNpyError) -> Self {
        Self::Npy(err.to_string())
    }
}
