//! Image source collaborator contract.

use std::sync::Arc;

use burn::tensor::backend::Backend;
use nalgebra::Matrix4;

use super::volume::VolumeData;
use crate::error::Result;
use crate::spatial::{Direction3, Vector3};
use crate::transform::FrameTransform;

/// What the orientation and placement code needs from a loaded image.
pub trait ImageSource<B: Backend> {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Voxel samples, in array order.
    fn voxels(&self) -> &VolumeData<B>;

    /// World direction of each array axis, in array-axis order.
    fn array_axis_directions(&self) -> [Vector3; 3];

    /// Homogeneous index-to-world affine.
    fn index_to_world(&self) -> Matrix4<f64>;

    /// Index-to-world direction matrix (columns are index-axis directions).
    fn direction(&self) -> Direction3;

    /// Whether a transform is attached but not yet hardened.
    fn has_pending_transform(&self) -> bool;

    /// Whether the raw voxel buffer carries an identity direction matrix.
    fn raw_direction_is_identity(&self) -> bool;

    /// Attach a world-to-world transform without changing the geometry yet.
    fn attach_transform(&mut self, transform: Arc<FrameTransform>);

    /// Fold the attached transform into the geometry.
    fn harden_transform(&mut self) -> Result<()>;
}
