//! Index-to-world geometry of an image.
//!
//! The geometry describes how continuous index coordinates `(i, j, k)` map
//! to physical RAS coordinates: `point = origin + Direction · (index ⊙ spacing)`.

use nalgebra::{Matrix4, Vector3 as NaVector3};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::spatial::{Direction3, Point3, Spacing3, Vector3};

/// Origin, spacing and direction of a 3D image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Physical coordinate of the first voxel (index 0, 0, 0).
    origin: Point3,
    /// Physical distance between voxels along each index axis.
    spacing: Spacing3,
    /// Orientation of the index axes (columns are i, j, k directions).
    direction: Direction3,
}

impl ImageGeometry {
    /// Create new image geometry.
    pub fn new(origin: Point3, spacing: Spacing3, direction: Direction3) -> Self {
        Self {
            origin,
            spacing,
            direction,
        }
    }

    /// Decompose an index-to-world affine into origin, spacing and direction.
    ///
    /// Spacing is the norm of each linear column; direction is the
    /// normalized columns. Zero-length or non-finite columns are rejected.
    pub fn from_index_to_world(matrix: &Matrix4<f64>) -> Result<Self> {
        let origin = Point3::new([matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]]);

        let mut spacing = Spacing3::zeros();
        let mut columns = [Vector3::zeros(); 3];
        for axis in 0..3 {
            let col: NaVector3<f64> = matrix.fixed_view::<3, 1>(0, axis).into_owned();
            let norm = col.norm();
            if norm < 1e-9 {
                return Err(CoreError::singular(format!(
                    "index axis {} collapses to zero length",
                    axis
                )));
            }
            spacing[axis] = norm;
            columns[axis] = Vector3::new([col[0] / norm, col[1] / norm, col[2] / norm]);
        }
        if !spacing.is_valid() {
            return Err(CoreError::singular(format!(
                "index-to-world affine has non-finite spacing {:?}",
                spacing.to_vec()
            )));
        }

        Ok(Self::new(origin, spacing, Direction3::from_columns(columns)))
    }

    /// Get the origin.
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Get the spacing.
    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    /// Get the direction.
    pub fn direction(&self) -> &Direction3 {
        &self.direction
    }

    /// Homogeneous index-to-world matrix `[Direction · diag(spacing) | origin]`.
    pub fn index_to_world(&self) -> Matrix4<f64> {
        let linear = self.direction.inner() * nalgebra::Matrix3::from_diagonal(self.spacing.inner());
        let mut m = linear.to_homogeneous();
        for r in 0..3 {
            m[(r, 3)] = self.origin[r];
        }
        m
    }

    /// Geometry obtained by following this geometry with a world-to-world transform.
    pub fn transformed(&self, world_to_world: &Matrix4<f64>) -> Result<Self> {
        Self::from_index_to_world(&(world_to_world * self.index_to_world()))
    }

    /// Convert a continuous index to a physical point.
    pub fn index_to_physical(&self, index: &Point3) -> Point3 {
        let mut scaled = Vector3::zeros();
        for i in 0..3 {
            scaled[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled
    }
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            spacing: Spacing3::uniform(1.0),
            direction: Direction3::identity(),
        }
    }
}
