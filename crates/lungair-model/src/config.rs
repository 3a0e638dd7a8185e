//! Model configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Side length of the square network input.
pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// Docker image of the packaged deploy application.
pub const DEFAULT_DOCKER_IMAGE: &str =
    "ghcr.io/kitwaremedical/lungair-desktop-application/lung_air_model_deploy:latest";

/// Configuration shared by all inference backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Network input side length.
    pub image_size: usize,
    /// Saved weights (`.pth`).
    pub weights_path: PathBuf,
    /// `monai-deploy` executable.
    pub deploy_executable: PathBuf,
    /// Deploy application run by `monai-deploy exec`.
    pub deploy_app_path: PathBuf,
    /// Image run by `monai-deploy run`.
    pub docker_image: String,
    /// Separate left and right lung in the network output.
    pub post_process: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            weights_path: PathBuf::from("PyTorchModels/LungSegmentation/model0018.pth"),
            deploy_executable: PathBuf::from("monai-deploy"),
            deploy_app_path: PathBuf::from("deploy_app.py"),
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            post_process: false,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_size(mut self, image_size: usize) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }

    pub fn with_deploy_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.deploy_executable = path.into();
        self
    }

    pub fn with_deploy_app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.deploy_app_path = path.into();
        self
    }

    pub fn with_docker_image(mut self, image: impl Into<String>) -> Self {
        self.docker_image = image.into();
        self
    }

    /// Run left/right lung post-processing on local-weights output.
    pub fn with_post_processing(mut self) -> Self {
        self.post_process = true;
        self
    }

    /// Model archive used by the deploy backends: the weights path with a
    /// trailing `.pth` replaced by `.zip`, or `.zip` appended otherwise.
    pub fn model_zip_path(&self) -> PathBuf {
        if self.weights_path.extension().is_some_and(|ext| ext == "pth") {
            return self.weights_path.with_extension("zip");
        }
        let mut path = OsString::from(self.weights_path.as_os_str());
        path.push(".zip");
        PathBuf::from(path)
    }
}
