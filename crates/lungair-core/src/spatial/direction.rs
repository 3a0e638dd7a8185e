//! Direction type for representing image orientation.
//!
//! Direction matrices represent orientation of image axes in physical space.

use nalgebra::{Matrix4, SMatrix};
use serde::{Deserialize, Serialize};
use super::Vector;

/// Tolerance used by [`Direction::is_orthogonal`].
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// Direction matrix representing image orientation.
///
/// The direction matrix is a D×D matrix where column i is the direction
/// of the i-th image index axis in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Build a direction matrix from its axis columns.
    pub fn from_columns(columns: [Vector<D>; D]) -> Self {
        let cols: Vec<_> = columns.iter().map(|c| c.0).collect();
        Self(SMatrix::from_columns(&cols))
    }

    /// Check if direction matrix is orthogonal, i.e. `M * Mᵀ ≈ I`.
    pub fn is_orthogonal(&self) -> bool {
        self.is_orthogonal_within(ORTHOGONALITY_TOLERANCE)
    }

    /// Check orthogonality with an explicit tolerance.
    pub fn is_orthogonal_within(&self, tolerance: f64) -> bool {
        let product = self.0 * self.0.transpose();
        (product - SMatrix::<f64, D, D>::identity()).amax() < tolerance
    }

    /// Check if the matrix is the identity within `tolerance`.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        (self.0 - SMatrix::<f64, D, D>::identity()).amax() < tolerance
    }

    /// Direction of index axis `axis`.
    pub fn column(&self, axis: usize) -> Vector<D> {
        Vector(self.0.column(axis).into_owned())
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }

    /// Get mutable reference to inner nalgebra matrix.
    pub fn inner_mut(&mut self) -> &mut SMatrix<f64, D, D> {
        &mut self.0
    }
}

impl Direction<3> {
    /// Embed as a homogeneous 4×4 matrix with zero translation.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        self.0.to_homogeneous()
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}
