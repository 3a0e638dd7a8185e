//! Left/right lung separation of a binary lung mask.
//!
//! "Left" and "right" here are sides of the image, not of the patient.

use std::collections::BTreeSet;

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components as label_regions, Connectivity};
use ndarray::{Array2, ArrayView2};

use crate::error::{ModelError, Result};

/// Output label of the lung on the image's left side.
pub const LEFT_LABEL: u8 = 1;
/// Output label of the lung on the image's right side.
pub const RIGHT_LABEL: u8 = 2;

/// Size ratio between the two lungs above which the split is reported as suspicious.
const MAX_SIZE_RATIO: f64 = 2.0;

/// Artifacts of each post-processing stage, kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessSteps {
    /// 4-connected components of the input, background 0.
    pub connected_components: Array2<usize>,
    /// `(row, column)` centroids of the two largest components, largest first.
    pub centroids: [[f64; 2]; 2],
    /// Left/right labels before hole filling.
    pub unfilled: Array2<u8>,
    /// Left/right labels after hole filling.
    pub filled: Array2<u8>,
}

/// Post-processed mask and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessOutput {
    pub mask: Array2<u8>,
    pub steps: PostProcessSteps,
}

/// Turns a binary lung mask into a left lung (label 1) and a right lung
/// (label 2), each connected and without holes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LungPostProcessor;

impl LungPostProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Process a `(rows, cols)` mask with labels 0 (background) and nonzero (lung).
    ///
    /// # Errors
    /// [`ModelError::PostProcess`] if fewer than two components are found.
    pub fn process(&self, mask: &ArrayView2<u8>) -> Result<PostProcessOutput> {
        let components = connected_components(mask);
        let sizes = component_sizes(&components);

        let mut by_size: Vec<(usize, usize)> = sizes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, &size)| size > 0)
            .map(|(label, &size)| (label, size))
            .collect();
        by_size.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        if by_size.len() < 2 {
            return Err(ModelError::post_process(format!(
                "expected a left and a right lung, found {} component(s)",
                by_size.len()
            )));
        }
        let (first, first_size) = by_size[0];
        let (second, second_size) = by_size[1];
        if first_size as f64 / second_size as f64 > MAX_SIZE_RATIO {
            tracing::warn!(
                first_size,
                second_size,
                "one lung segment is much larger than the other"
            );
        }

        let centroids = [centroid(&components, first), centroid(&components, second)];
        let (left, right) = if centroids[0][1] <= centroids[1][1] {
            (first, second)
        } else {
            (second, first)
        };

        let cols = mask.ncols() as f64;
        let left_col = centroids[if left == first { 0 } else { 1 }][1] / cols;
        let right_col = centroids[if right == first { 0 } else { 1 }][1] / cols;
        if !(left_col > 0.0 && left_col < 0.5 && right_col > 0.5 && right_col < 1.0) {
            tracing::warn!(
                left_col,
                right_col,
                "left and right lung segments are not reasonably positioned"
            );
        }

        let unfilled = components.mapv(|label| {
            if label == left {
                LEFT_LABEL
            } else if label == right {
                RIGHT_LABEL
            } else {
                0
            }
        });
        let filled = fill_holes(&fill_holes(&unfilled, LEFT_LABEL), RIGHT_LABEL);

        tracing::debug!(left, right, "separated left and right lung");
        Ok(PostProcessOutput {
            mask: filled.clone(),
            steps: PostProcessSteps {
                connected_components: components,
                centroids,
                unfilled,
                filled,
            },
        })
    }
}

/// 4-connected component labelling of the nonzero pixels.
///
/// Labels are consecutive from 1 in raster order of first appearance.
pub fn connected_components(mask: &ArrayView2<u8>) -> Array2<usize> {
    let foreground = binary_image(mask.dim(), |r, c| mask[[r, c]] != 0);
    label_array(&foreground)
}

/// Binary 8-bit image, 255 where `inside(row, col)` holds.
fn binary_image((rows, cols): (usize, usize), inside: impl Fn(usize, usize) -> bool) -> GrayImage {
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        Luma([if inside(y as usize, x as usize) { 255 } else { 0 }])
    })
}

fn label_array(image: &GrayImage) -> Array2<usize> {
    let labels = label_regions(image, Connectivity::Four, Luma([0u8]));
    let (cols, rows) = labels.dimensions();
    Array2::from_shape_fn((rows as usize, cols as usize), |(r, c)| {
        labels.get_pixel(c as u32, r as u32).0[0] as usize
    })
}

/// Pixel count per label, indexed by label.
fn component_sizes(components: &Array2<usize>) -> Vec<usize> {
    let max = components.iter().copied().max().unwrap_or(0);
    let mut sizes = vec![0usize; max + 1];
    for &label in components.iter() {
        sizes[label] += 1;
    }
    sizes
}

fn centroid(components: &Array2<usize>, label: usize) -> [f64; 2] {
    let mut sum = [0.0, 0.0];
    let mut count = 0usize;
    for ((r, c), &value) in components.indexed_iter() {
        if value == label {
            sum[0] += r as f64;
            sum[1] += c as f64;
            count += 1;
        }
    }
    let n = count.max(1) as f64;
    [sum[0] / n, sum[1] / n]
}

/// Set to `label` every pixel not 4-connected to the border through non-`label` pixels.
pub fn fill_holes(mask: &Array2<u8>, label: u8) -> Array2<u8> {
    let (rows, cols) = mask.dim();
    let regions = label_array(&binary_image((rows, cols), |r, c| mask[[r, c]] != label));

    let outside: BTreeSet<usize> = regions
        .indexed_iter()
        .filter(|&((r, c), &region)| {
            region != 0 && (r == 0 || c == 0 || r + 1 == rows || c + 1 == cols)
        })
        .map(|(_, &region)| region)
        .collect();

    let mut filled = mask.clone();
    for (value, &region) in filled.iter_mut().zip(regions.iter()) {
        if region != 0 && !outside.contains(&region) {
            *value = label;
        }
    }
    filled
}

/// Copy an integer label tensor into an `(rows, cols)` array.
pub fn mask_to_array<B: Backend>(mask: &Tensor<B, 2, Int>) -> Result<Array2<u8>> {
    let [rows, cols] = mask.dims();
    let data = mask.clone().into_data();
    let values = data
        .iter::<i64>()
        .map(|v| {
            u8::try_from(v).map_err(|_| ModelError::invalid_input(format!("label {v} out of range")))
        })
        .collect::<Result<Vec<u8>>>()?;
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| ModelError::invalid_input(e.to_string()))
}

/// Integer label tensor from an `(rows, cols)` array.
pub fn array_to_mask<B: Backend>(array: &Array2<u8>, device: &B::Device) -> Tensor<B, 2, Int> {
    let (rows, cols) = array.dim();
    let values: Vec<i64> = array.iter().map(|&v| v as i64).collect();
    Tensor::from_data(TensorData::new(values, [rows, cols]), device)
}
