//! Coronal-plane helpers for radiographs.
//!
//! A radiograph is a 2D image of the coronal plane. Importers usually
//! produce it as a single axial slice, so every loaded image is rotated by
//! [`axial_to_coronal`] and 2D linear maps are embedded into the S/R plane.

use nalgebra::{Matrix2, Matrix4};

use super::frame::{Frame, FrameTransform};

/// RAS indices of the coronal plane, in (row, column) order: Superior, Right.
pub const CORONAL_PLANE_AXES: [usize; 2] = [2, 0];

/// Rotation taking an axial slice into the coronal plane.
#[rustfmt::skip]
pub const AXIAL_TO_CORONAL: [[f64; 4]; 4] = [
    [1.0, 0.0,  0.0, 0.0],
    [0.0, 0.0, -1.0, 0.0],
    [0.0, 1.0,  0.0, 0.0],
    [0.0, 0.0,  0.0, 1.0],
];

/// The axial-to-coronal orientation as a world-to-world transform.
pub fn axial_to_coronal() -> FrameTransform {
    let m = Matrix4::from_fn(|r, c| AXIAL_TO_CORONAL[r][c]);
    FrameTransform::new(Frame::World, Frame::World, m)
}

/// Model grid (row, column, slice) to ModelRas.
///
/// Rows run inferior, columns run left, the slice axis runs anterior.
pub fn model_grid_to_ras() -> FrameTransform {
    let mut m = Matrix4::zeros();
    m[(2, 0)] = -1.0;
    m[(0, 1)] = -1.0;
    m[(1, 2)] = 1.0;
    m[(3, 3)] = 1.0;
    FrameTransform::new(Frame::Model, Frame::ModelRas, m)
}

/// Embed a 2×2 linear map acting on (row, column) coordinates into a 4×4
/// identity, at the S and R slots of an RAS-ordered homogeneous vector.
///
/// `m[(0, 0)]` lands at `[2, 2]`, `m[(0, 1)]` at `[2, 0]`, `m[(1, 0)]` at
/// `[0, 2]` and `m[(1, 1)]` at `[0, 0]`.
pub fn embed_coronal_2x2(m: &Matrix2<f64>) -> Matrix4<f64> {
    let mut out = Matrix4::identity();
    for (a, &ra) in CORONAL_PLANE_AXES.iter().enumerate() {
        for (b, &rb) in CORONAL_PLANE_AXES.iter().enumerate() {
            out[(ra, rb)] = m[(a, b)];
        }
    }
    out
}
