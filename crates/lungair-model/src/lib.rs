pub mod cache;
pub mod config;
pub mod deploy;
pub mod error;
pub mod inference;
pub mod network;
pub mod postprocess;
pub mod resize;
pub mod source;

pub use cache::ModelCache;
pub use config::ModelConfig;
pub use deploy::{DeployRunner, DeployTarget};
pub use error::{ModelError, Result};
pub use inference::{Inference, InferenceOutput};
pub use network::{SegmentationModel, SegmentationNetwork};
pub use postprocess::LungPostProcessor;
pub use source::ModelSource;
