//! In-process segmentation with a local network.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use nalgebra::Matrix2;

use crate::config::ModelConfig;
use crate::error::{ModelError, Result};
use crate::inference::{Inference, InferenceOutput};
use crate::postprocess::{array_to_mask, mask_to_array, LungPostProcessor};
use crate::resize::resize_bilinear;

/// Number of logit channels: background and lung.
pub const OUTPUT_CHANNELS: usize = 2;

/// A trained lung segmentation network.
pub trait SegmentationNetwork<B: Backend> {
    /// Map `[batch, 1, n, n]` images to `[batch, 2, n, n]` logits.
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4>;
}

impl<B, F> SegmentationNetwork<B> for F
where
    B: Backend,
    F: Fn(Tensor<B, 4>) -> Tensor<B, 4>,
{
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        self(input)
    }
}

/// Local-weights inference backend.
///
/// Resizes the canonical image to the network's square input, runs the
/// network and takes the per-pixel argmax.
#[derive(Debug, Clone)]
pub struct SegmentationModel<N> {
    network: N,
    image_size: usize,
    post_processor: Option<LungPostProcessor>,
}

impl<N> SegmentationModel<N> {
    pub fn new(network: N, config: &ModelConfig) -> Self {
        Self {
            network,
            image_size: config.image_size,
            post_processor: config.post_process.then(LungPostProcessor::new),
        }
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Map from the `n × n` model grid back onto a `rows × cols` image.
    pub fn model_to_image(&self, rows: usize, cols: usize) -> Matrix2<f64> {
        let n = self.image_size as f64;
        Matrix2::new(rows as f64 / n, 0.0, 0.0, cols as f64 / n)
    }
}

impl<B, N> Inference<B> for SegmentationModel<N>
where
    B: Backend,
    N: SegmentationNetwork<B>,
{
    fn infer(&self, image: Tensor<B, 2>) -> Result<InferenceOutput<B>> {
        let [rows, cols] = image.dims();
        if rows == 0 || cols == 0 {
            return Err(ModelError::invalid_input(format!(
                "image must be non-empty, got {rows}×{cols}"
            )));
        }
        let n = self.image_size;

        let input = resize_bilinear(image, [n, n]).reshape([1, 1, n, n]);
        let logits = self.network.forward(input);
        let dims = logits.dims();
        if dims != [1, OUTPUT_CHANNELS, n, n] {
            return Err(ModelError::inference(format!(
                "network output shape {dims:?}, expected [1, {OUTPUT_CHANNELS}, {n}, {n}]"
            )));
        }

        let mask: Tensor<B, 2, Int> = logits.argmax(1).equal_elem(1).int().reshape([n, n]);
        let model_to_image = self.model_to_image(rows, cols);
        tracing::debug!(rows, cols, image_size = n, "ran local segmentation network");

        match &self.post_processor {
            None => Ok(InferenceOutput::new(mask, model_to_image)),
            Some(processor) => {
                let device = mask.device();
                let processed = processor.process(&mask_to_array(&mask)?.view())?;
                Ok(InferenceOutput::left_right(
                    array_to_mask(&processed.mask, &device),
                    model_to_image,
                ))
            }
        }
    }
}
