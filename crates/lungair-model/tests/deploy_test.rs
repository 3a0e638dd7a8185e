#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use image::GrayImage;
use lungair_model::deploy::{DeployRunner, DeployTarget, MASK_FILE, MATRIX_FILE};
use lungair_model::{Inference, ModelError};
use nalgebra::Matrix2;
use ndarray::array;

type Backend = NdArray<f32>;

fn write_script(dir: &Path, body: &str) -> Result<PathBuf> {
    let path = dir.join("fake-monai-deploy");
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn write_fixture(dir: &Path) -> Result<()> {
    let mask = GrayImage::from_raw(3, 2, vec![0, 1, 1, 0, 0, 1]).expect("mask size");
    mask.save(dir.join(MASK_FILE))?;
    ndarray_npy::write_npy(dir.join(MATRIX_FILE), &array![[0.5f64, 0.0], [0.0, 0.25]])?;
    Ok(())
}

#[test]
fn test_docker_runner_reads_outputs() -> Result<()> {
    let fixture = tempfile::tempdir()?;
    write_fixture(fixture.path())?;
    let script = write_script(
        fixture.path(),
        &format!(
            "test \"$1\" = run || exit 2\n\
             test -f \"$3/input.png\" || exit 3\n\
             cp \"{dir}/{MASK_FILE}\" \"$4/{MASK_FILE}\"\n\
             cp \"{dir}/{MATRIX_FILE}\" \"$4/{MATRIX_FILE}\"\n\
             echo segmented",
            dir = fixture.path().display()
        ),
    )?;

    let runner = DeployRunner::new(script, DeployTarget::Docker { image: "lungair:test".into() });
    let image = Tensor::<Backend, 2>::from_data(
        TensorData::new(vec![0.0f32, 128.0, 255.0, 300.0], [2, 2]),
        &Default::default(),
    );
    let out = runner.infer(image)?;

    assert_eq!(out.mask.dims(), [2, 3]);
    assert_eq!(out.labels(), vec![1]);
    assert_eq!(out.model_to_image, Matrix2::new(0.5, 0.0, 0.0, 0.25));
    Ok(())
}

#[test]
fn test_failing_process_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "echo broken >&2\nexit 7")?;
    let runner = DeployRunner::new(script, DeployTarget::Docker { image: "lungair:test".into() });

    let image = Tensor::<Backend, 2>::zeros([2, 2], &Default::default());
    match runner.infer(image) {
        Err(ModelError::Process { stderr, .. }) => assert!(stderr.contains("broken")),
        other => panic!("expected a process error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_executable_is_reported() {
    let runner = DeployRunner::new(
        "/nonexistent/monai-deploy",
        DeployTarget::Docker { image: "lungair:test".into() },
    );
    let image = Tensor::<Backend, 2>::zeros([2, 2], &Default::default());
    assert!(matches!(runner.infer(image), Err(ModelError::Process { .. })));
}
