#![allow(dead_code)]

use std::cell::Cell;

use burn::tensor::{Int, Tensor, TensorData};
use burn_ndarray::NdArray;
use lungair_core::spatial::{Direction3, Point3, Spacing3, Vector3};
use lungair_core::{ImageGeometry, Volume};
use lungair_model::{InferenceOutput, ModelError};
use nalgebra::Matrix2;

pub type Backend = NdArray<f32>;

/// Model grid side used by the stub networks.
pub const MODEL_SIZE: usize = 4;

/// Geometry of a PNG as importers load it: LPS-flipped i and j.
pub fn png_geometry() -> ImageGeometry {
    ImageGeometry::new(
        Point3::new([120.0, 80.0, 0.0]),
        Spacing3::new([0.5, 0.25, 1.0]),
        Direction3::from_columns([
            Vector3::new([-1.0, 0.0, 0.0]),
            Vector3::new([0.0, -1.0, 0.0]),
            Vector3::new([0.0, 0.0, 1.0]),
        ]),
    )
}

/// Single-slice `[1, rows, cols]` volume holding `0, 1, 2, ...`.
pub fn png_volume(name: &str, rows: usize, cols: usize) -> Volume<Backend> {
    let values: Vec<f32> = (0..rows * cols).map(|v| v as f32).collect();
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, [1, rows, cols]), &Default::default());
    Volume::scalar(name, data, png_geometry())
}

/// Volume whose axes never resolve: no axis points left once oriented.
pub fn misoriented_volume(name: &str) -> Volume<Backend> {
    let data = Tensor::<Backend, 3>::zeros([1, 4, 6], &Default::default());
    Volume::scalar(name, data, ImageGeometry::default())
}

/// Stub network output: label 1 on the left half of the model grid, 2 on the right half.
pub fn two_lung_output(image: &Tensor<Backend, 2>) -> InferenceOutput<Backend> {
    let [rows, cols] = image.dims();
    let n = MODEL_SIZE;
    let labels: Vec<i64> = (0..n * n)
        .map(|i| if i % n < n / 2 { 1 } else { 2 })
        .collect();
    let mask = Tensor::<Backend, 2, Int>::from_data(TensorData::new(labels, [n, n]), &image.device());
    InferenceOutput::left_right(
        mask,
        Matrix2::new(rows as f64 / n as f64, 0.0, 0.0, cols as f64 / n as f64),
    )
}

/// Inference stub that counts its calls and records the input shapes.
#[derive(Default)]
pub struct CountingModel {
    pub calls: Cell<usize>,
    pub last_shape: Cell<Option<[usize; 2]>>,
}

impl lungair_model::Inference<Backend> for CountingModel {
    fn infer(&self, image: Tensor<Backend, 2>) -> lungair_model::Result<InferenceOutput<Backend>> {
        self.calls.set(self.calls.get() + 1);
        self.last_shape.set(Some(image.dims()));
        Ok(two_lung_output(&image))
    }
}

/// Inference stub that always fails.
pub fn failing_model(_: Tensor<Backend, 2>) -> lungair_model::Result<InferenceOutput<Backend>> {
    Err(ModelError::inference("network crashed"))
}
