//! Inference backend variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where segmentation inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelSource {
    /// In-process network with locally saved weights.
    LocalWeights,
    /// MONAI Deploy application run from a local model archive.
    LocalDeploy,
    /// MONAI Deploy application packaged as a docker image.
    DockerDeploy,
}

impl ModelSource {
    pub const ALL: [ModelSource; 3] = [Self::LocalWeights, Self::LocalDeploy, Self::DockerDeploy];

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::LocalWeights => "Locally saved model weights, without MONAI Deploy",
            Self::LocalDeploy => "MONAI Deploy with locally saved model weights",
            Self::DockerDeploy => "MONAI Deploy with docker image",
        }
    }

    /// Whether inference runs in an external MONAI Deploy process.
    pub fn is_deploy(&self) -> bool {
        matches!(self, Self::LocalDeploy | Self::DockerDeploy)
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::LocalWeights
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
