//! MONAI Deploy process runner.
//!
//! The canonical image is handed to the deploy application through files:
//! an 8-bit grayscale `input.png` in a fresh input directory, and the
//! application writes `mask.png` and `model_to_img_matrix.npy` into a fresh
//! output directory. Both directories are removed afterwards.

use std::path::{Path, PathBuf};
use std::process::Command;

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use image::GrayImage;
use nalgebra::Matrix2;
use ndarray::Array2;

use crate::config::ModelConfig;
use crate::error::{ModelError, Result};
use crate::inference::{Inference, InferenceOutput};
use crate::source::ModelSource;

pub const INPUT_FILE: &str = "input.png";
pub const MASK_FILE: &str = "mask.png";
pub const MATRIX_FILE: &str = "model_to_img_matrix.npy";

/// How the deploy application is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployTarget {
    /// `monai-deploy exec <app> -m <model.zip> -i <in> -o <out>`
    Local { app: PathBuf, model_zip: PathBuf },
    /// `monai-deploy run <image> <in> <out>`
    Docker { image: String },
}

/// Inference backend running a MONAI Deploy application in a child process.
#[derive(Debug, Clone)]
pub struct DeployRunner {
    executable: PathBuf,
    target: DeployTarget,
}

impl DeployRunner {
    pub fn new(executable: impl Into<PathBuf>, target: DeployTarget) -> Self {
        Self {
            executable: executable.into(),
            target,
        }
    }

    /// Runner for a deploy [`ModelSource`].
    ///
    /// # Errors
    /// [`ModelError::ModelNotLoaded`] for [`ModelSource::LocalWeights`], which
    /// runs in-process.
    pub fn from_config(source: ModelSource, config: &ModelConfig) -> Result<Self> {
        let target = match source {
            ModelSource::LocalDeploy => DeployTarget::Local {
                app: config.deploy_app_path.clone(),
                model_zip: config.model_zip_path(),
            },
            ModelSource::DockerDeploy => DeployTarget::Docker {
                image: config.docker_image.clone(),
            },
            ModelSource::LocalWeights => {
                return Err(ModelError::not_loaded(format!(
                    "'{source}' does not run through MONAI Deploy"
                )))
            }
        };
        Ok(Self::new(&config.deploy_executable, target))
    }

    pub fn target(&self) -> &DeployTarget {
        &self.target
    }

    /// The command that processes `input_dir` into `output_dir`.
    pub fn command(&self, input_dir: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        match &self.target {
            DeployTarget::Local { app, model_zip } => {
                command
                    .arg("exec")
                    .arg(app)
                    .arg("-m")
                    .arg(model_zip)
                    .arg("-i")
                    .arg(input_dir)
                    .arg("-o")
                    .arg(output_dir);
            }
            DeployTarget::Docker { image } => {
                command.arg("run").arg(image).arg(input_dir).arg(output_dir);
            }
        }
        command
    }

    fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        let mut command = self.command(input_dir, output_dir);
        tracing::info!(command = ?command, "running MONAI Deploy");
        let output = command.output().map_err(|e| ModelError::Process {
            program: self.executable.clone(),
            status: "not started".to_string(),
            stderr: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::info!(output = %stdout.trim_end(), "MONAI Deploy output");
        }
        if !output.status.success() {
            return Err(ModelError::Process {
                program: self.executable.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl<B: Backend> Inference<B> for DeployRunner {
    fn infer(&self, image: Tensor<B, 2>) -> Result<InferenceOutput<B>> {
        let device = image.device();
        let input_dir = tempfile::tempdir()?;
        let output_dir = tempfile::tempdir()?;

        write_input_png(image, &input_dir.path().join(INPUT_FILE))?;
        self.run(input_dir.path(), output_dir.path())?;
        read_outputs(output_dir.path(), &device)
    }
}

/// Save a canonical image as 8-bit grayscale, values rounded and clamped to `[0, 255]`.
pub fn write_input_png<B: Backend>(image: Tensor<B, 2>, path: &Path) -> Result<()> {
    let [rows, cols] = image.dims();
    let data = image.into_data();
    let pixels: Vec<u8> = data
        .iter::<f32>()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    let png = GrayImage::from_raw(cols as u32, rows as u32, pixels).ok_or_else(|| {
        ModelError::invalid_input(format!("cannot build a {rows}×{cols} grayscale image"))
    })?;
    png.save(path)?;
    Ok(())
}

/// Read the mask and model-to-image matrix written by the deploy application.
pub fn read_outputs<B: Backend>(output_dir: &Path, device: &B::Device) -> Result<InferenceOutput<B>> {
    let mask = image::open(output_dir.join(MASK_FILE))?.into_luma8();
    let (cols, rows) = mask.dimensions();
    let labels: Vec<i64> = mask.into_raw().into_iter().map(i64::from).collect();
    let mask = Tensor::<B, 2, Int>::from_data(
        TensorData::new(labels, [rows as usize, cols as usize]),
        device,
    );

    let matrix: Array2<f64> = ndarray_npy::read_npy(output_dir.join(MATRIX_FILE))?;
    if matrix.dim() != (2, 2) {
        return Err(ModelError::inference(format!(
            "model-to-image matrix has shape {:?}, expected (2, 2)",
            matrix.dim()
        )));
    }
    let model_to_image = Matrix2::new(
        matrix[[0, 0]],
        matrix[[0, 1]],
        matrix[[1, 0]],
        matrix[[1, 1]],
    );
    Ok(InferenceOutput::new(mask, model_to_image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(command: &Command) -> Vec<&OsStr> {
        command.get_args().collect()
    }

    #[test]
    fn test_local_command_line() {
        let config = ModelConfig::new()
            .with_weights_path("/models/model0018.pth")
            .with_deploy_app_path("/app/deploy_app.py");
        let runner = DeployRunner::from_config(ModelSource::LocalDeploy, &config).unwrap();
        let command = runner.command(Path::new("/tmp/in"), Path::new("/tmp/out"));
        assert_eq!(command.get_program(), "monai-deploy");
        assert_eq!(
            args(&command),
            ["exec", "/app/deploy_app.py", "-m", "/models/model0018.zip", "-i", "/tmp/in", "-o", "/tmp/out"]
        );
    }

    #[test]
    fn test_docker_command_line() {
        let config = ModelConfig::new().with_docker_image("lungair:test");
        let runner = DeployRunner::from_config(ModelSource::DockerDeploy, &config).unwrap();
        let command = runner.command(Path::new("/tmp/in"), Path::new("/tmp/out"));
        assert_eq!(args(&command), ["run", "lungair:test", "/tmp/in", "/tmp/out"]);
    }

    #[test]
    fn test_local_weights_has_no_runner() {
        let err = DeployRunner::from_config(ModelSource::LocalWeights, &ModelConfig::default());
        assert!(matches!(err, Err(ModelError::ModelNotLoaded(_))));
    }
}
