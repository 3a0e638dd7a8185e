//! Coordinate frames and frame-tagged affine transforms.
//!
//! A chest radiograph passes through five frames between the segmentation
//! network and the viewer:
//!
//! * [`Frame::Model`]: pixel grid of the network input/output;
//! * [`Frame::ModelRas`]: that grid with its axes sent to unit RAS directions;
//! * [`Frame::ArrayIndex`]: index space of the source image;
//! * [`Frame::ArrayRas`]: that index space with its axes sent to unit RAS directions;
//! * [`Frame::World`]: physical RAS space.

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::spatial::Point3;

/// A named coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    Model,
    ModelRas,
    ArrayIndex,
    ArrayRas,
    World,
}

/// Homogeneous 4×4 affine transform from one frame into another.
///
/// Points are column vectors: `y = M · [x; 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTransform {
    from: Frame,
    to: Frame,
    matrix: Matrix4<f64>,
}

impl FrameTransform {
    /// Create a new frame transform.
    pub fn new(from: Frame, to: Frame, matrix: Matrix4<f64>) -> Self {
        Self { from, to, matrix }
    }

    /// Identity on a single frame.
    pub fn identity(frame: Frame) -> Self {
        Self::new(frame, frame, Matrix4::identity())
    }

    /// Source frame.
    pub fn from_frame(&self) -> Frame {
        self.from
    }

    /// Destination frame.
    pub fn to_frame(&self) -> Frame {
        self.to
    }

    /// The homogeneous matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// `next ∘ self`: apply `self` first, then `next`.
    ///
    /// Fails with [`CoreError::FrameMismatch`] unless `self` lands in the frame
    /// `next` starts from.
    pub fn then(&self, next: &FrameTransform) -> Result<FrameTransform> {
        if self.to != next.from {
            return Err(CoreError::FrameMismatch {
                left: self.to,
                right: next.from,
            });
        }
        Ok(FrameTransform::new(self.from, next.to, next.matrix * self.matrix))
    }

    /// Exact inverse, mapping `to` back into `from`.
    pub fn inverse(&self) -> Result<FrameTransform> {
        let inv = self.matrix.try_inverse().ok_or_else(|| {
            CoreError::singular(format!("{:?} -> {:?} transform is not invertible", self.from, self.to))
        })?;
        Ok(FrameTransform::new(self.to, self.from, inv))
    }

    /// Map a single point.
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let h = self.matrix * Vector4::new(point[0], point[1], point[2], 1.0);
        Point3::new([h[0] / h[3], h[1] / h[3], h[2] / h[3]])
    }

    /// Largest absolute entrywise difference between the two matrices.
    pub fn max_abs_diff(&self, other: &FrameTransform) -> f64 {
        (self.matrix - other.matrix).amax()
    }
}
