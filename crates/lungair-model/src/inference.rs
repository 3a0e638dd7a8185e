//! Inference collaborator contract.

use std::collections::{BTreeMap, BTreeSet};

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use nalgebra::Matrix2;

use crate::error::Result;

/// Name given to label 1 of a binary lung mask.
pub const LUNG_FIELD: &str = "lung field";
/// Name of label 1 after left/right separation.
pub const LEFT_LUNG: &str = "left lung";
/// Name of label 2 after left/right separation.
pub const RIGHT_LUNG: &str = "right lung";

/// Label mask produced by a segmentation model, with its placement in the input image.
#[derive(Debug, Clone)]
pub struct InferenceOutput<B: Backend> {
    /// Label per model pixel; 0 is background.
    pub mask: Tensor<B, 2, Int>,
    /// Linear map from model (row, column) coordinates to input-image (row, column) coordinates.
    pub model_to_image: Matrix2<f64>,
    /// Display name for each label.
    pub segment_names: BTreeMap<i64, String>,
}

impl<B: Backend> InferenceOutput<B> {
    /// Binary lung-field output.
    pub fn new(mask: Tensor<B, 2, Int>, model_to_image: Matrix2<f64>) -> Self {
        Self {
            mask,
            model_to_image,
            segment_names: BTreeMap::from([(1, LUNG_FIELD.to_string())]),
        }
    }

    /// Output whose labels 1 and 2 are the left and right lung.
    pub fn left_right(mask: Tensor<B, 2, Int>, model_to_image: Matrix2<f64>) -> Self {
        Self {
            mask,
            model_to_image,
            segment_names: BTreeMap::from([
                (1, LEFT_LUNG.to_string()),
                (2, RIGHT_LUNG.to_string()),
            ]),
        }
    }

    /// Name for `label`, falling back to a generic one.
    pub fn segment_name(&self, label: i64) -> String {
        self.segment_names
            .get(&label)
            .cloned()
            .unwrap_or_else(|| format!("segment {label}"))
    }

    /// Distinct non-background labels present in the mask, ascending.
    pub fn labels(&self) -> Vec<i64> {
        let data = self.mask.clone().into_data();
        data.iter::<i64>()
            .filter(|&label| label >= 1)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// A function from a canonical image to a label mask.
///
/// The input has rows running inferior and columns running left. Identical
/// input must give identical output.
pub trait Inference<B: Backend> {
    fn infer(&self, image: Tensor<B, 2>) -> Result<InferenceOutput<B>>;
}

impl<B, F> Inference<B> for F
where
    B: Backend,
    F: Fn(Tensor<B, 2>) -> Result<InferenceOutput<B>>,
{
    fn infer(&self, image: Tensor<B, 2>) -> Result<InferenceOutput<B>> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    #[test]
    fn test_labels_skip_background() {
        let mask = Tensor::<Backend, 2, Int>::from_data(
            TensorData::new(vec![0i64, 2, 2, 0, 1, 0], [2, 3]),
            &Default::default(),
        );
        let out = InferenceOutput::new(mask, Matrix2::identity());
        assert_eq!(out.labels(), vec![1, 2]);
        assert_eq!(out.segment_name(1), "lung field");
        assert_eq!(out.segment_name(2), "segment 2");
    }

    #[test]
    fn test_closure_is_inference() {
        let threshold = |image: Tensor<Backend, 2>| -> Result<InferenceOutput<Backend>> {
            Ok(InferenceOutput::left_right(image.greater_elem(0.5).int(), Matrix2::identity()))
        };
        let image = Tensor::<Backend, 2>::from_data(
            TensorData::new(vec![0.0f32, 1.0, 1.0, 0.0], [2, 2]),
            &Default::default(),
        );
        let out = threshold.infer(image).unwrap();
        assert_eq!(out.labels(), vec![1]);
        assert_eq!(out.segment_name(1), "left lung");
    }
}
