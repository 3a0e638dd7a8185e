//! Bilinear image resize.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};

/// Source sample positions for one axis, with `align_corners = false`.
///
/// Output sample `o` reads source position `(o + 0.5) * in / out - 0.5`,
/// clamped at zero. Returns the lower and upper neighbour indices and the
/// weight of the upper neighbour.
fn axis_samples(input: usize, output: usize) -> (Vec<i64>, Vec<i64>, Vec<f32>) {
    let scale = input as f64 / output as f64;
    let mut lower = Vec::with_capacity(output);
    let mut upper = Vec::with_capacity(output);
    let mut weight = Vec::with_capacity(output);
    for o in 0..output {
        let src = ((o as f64 + 0.5) * scale - 0.5).max(0.0);
        let i0 = (src.floor() as usize).min(input - 1);
        let i1 = (i0 + 1).min(input - 1);
        lower.push(i0 as i64);
        upper.push(i1 as i64);
        weight.push((src - i0 as f64) as f32);
    }
    (lower, upper, weight)
}

/// Linear blend along `dim` of a 2D tensor.
fn resize_axis<B: Backend>(image: Tensor<B, 2>, dim: usize, output: usize) -> Tensor<B, 2> {
    let input = image.dims()[dim];
    if input == output {
        return image;
    }
    let device = image.device();
    let (lower, upper, weight) = axis_samples(input, output);

    let lower = Tensor::<B, 1, Int>::from_data(TensorData::new(lower, [output]), &device);
    let upper = Tensor::<B, 1, Int>::from_data(TensorData::new(upper, [output]), &device);
    let weight = Tensor::<B, 1>::from_data(TensorData::new(weight, [output]), &device);
    let weight = if dim == 0 {
        weight.reshape([output, 1])
    } else {
        weight.reshape([1, output])
    };

    let v0 = image.clone().select(dim, lower);
    let v1 = image.select(dim, upper);
    v0.clone() + (v1 - v0) * weight
}

/// Resize a 2D image to `[rows, cols]` with bilinear interpolation.
///
/// Pixel centers are aligned (`align_corners = false`); samples outside the
/// image clamp to the border.
pub fn resize_bilinear<B: Backend>(image: Tensor<B, 2>, size: [usize; 2]) -> Tensor<B, 2> {
    let rows = resize_axis(image, 0, size[0]);
    resize_axis(rows, 1, size[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    fn tensor(values: Vec<f32>, shape: [usize; 2]) -> Tensor<Backend, 2> {
        Tensor::from_data(TensorData::new(values, shape), &Default::default())
    }

    #[test]
    fn test_axis_samples_upsample() {
        let (lower, upper, weight) = axis_samples(2, 4);
        assert_eq!(lower, vec![0, 0, 0, 1]);
        assert_eq!(upper, vec![1, 1, 1, 1]);
        let expected = [0.0, 0.25, 0.75, 0.25];
        for (w, e) in weight.iter().zip(expected) {
            assert!((w - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_upsample_row() {
        let out = resize_bilinear(tensor(vec![0.0, 4.0], [1, 2]), [1, 4]);
        let data = out.into_data();
        let values = data.as_slice::<f32>().unwrap();
        let expected = [0.0, 1.0, 3.0, 4.0];
        for (v, e) in values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-5, "{values:?}");
        }
    }

    #[test]
    fn test_downsample_averages_pairs() {
        let out = resize_bilinear(tensor(vec![0.0, 2.0, 4.0, 6.0], [1, 4]), [1, 2]);
        let data = out.into_data();
        assert_eq!(data.as_slice::<f32>().unwrap(), &[1.0, 5.0]);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let out = resize_bilinear(Tensor::<Backend, 2>::ones([5, 7], &Default::default()), [8, 3]);
        assert_eq!(out.dims(), [8, 3]);
        let data = out.into_data();
        assert!(data.as_slice::<f32>().unwrap().iter().all(|v| (v - 1.0).abs() < 1e-6));
    }
}
