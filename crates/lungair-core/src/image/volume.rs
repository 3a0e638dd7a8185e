//! Single-slice volume holding a loaded radiograph.
//!
//! Voxel data is stored in array order `[k, j, i]`, the reverse of the index
//! order used by the geometry. Array axis `a` therefore corresponds to index
//! axis `2 - a`.

use std::sync::Arc;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use nalgebra::Matrix4;

use super::geometry::ImageGeometry;
use super::source::ImageSource;
use crate::error::{CoreError, Result};
use crate::spatial::{Direction3, Vector3};
use crate::transform::{Frame, FrameTransform};

/// Tolerance for treating the raw buffer direction matrix as the identity.
const RAW_DIRECTION_TOLERANCE: f64 = 1e-9;

/// Voxel samples of a volume.
#[derive(Debug, Clone)]
pub enum VolumeData<B: Backend> {
    /// One scalar per voxel, shape `[k, j, i]`.
    Scalar(Tensor<B, 3>),
    /// Several components per voxel, shape `[k, j, i, components]`.
    Multi(Tensor<B, 4>),
}

impl<B: Backend> VolumeData<B> {
    /// Spatial array shape `[k, j, i]`.
    pub fn array_shape(&self) -> [usize; 3] {
        match self {
            Self::Scalar(t) => t.dims(),
            Self::Multi(t) => {
                let [k, j, i, _] = t.dims();
                [k, j, i]
            }
        }
    }

    /// Number of scalar components per voxel.
    pub fn components(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Multi(t) => t.dims()[3],
        }
    }
}

/// Image resource for one radiograph.
#[derive(Debug, Clone)]
pub struct Volume<B: Backend> {
    name: String,
    data: VolumeData<B>,
    geometry: ImageGeometry,
    raw_direction: Direction3,
    pending: Option<Arc<FrameTransform>>,
}

impl<B: Backend> Volume<B> {
    /// Create a volume with an identity raw buffer direction and no pending transform.
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `data` - Voxel samples in `[k, j, i]` order
    /// * `geometry` - Index-to-world geometry
    pub fn new(name: impl Into<String>, data: VolumeData<B>, geometry: ImageGeometry) -> Self {
        Self {
            name: name.into(),
            data,
            geometry,
            raw_direction: Direction3::identity(),
            pending: None,
        }
    }

    /// Scalar volume from a `[k, j, i]` tensor.
    pub fn scalar(name: impl Into<String>, data: Tensor<B, 3>, geometry: ImageGeometry) -> Self {
        Self::new(name, VolumeData::Scalar(data), geometry)
    }

    /// Set the direction matrix stored on the raw voxel buffer.
    ///
    /// Importers normally leave this at the identity; anything else means the
    /// reported axis directions may not describe the buffer layout.
    pub fn with_raw_direction(mut self, raw_direction: Direction3) -> Self {
        self.raw_direction = raw_direction;
        self
    }

    /// Voxel data.
    pub fn data(&self) -> &VolumeData<B> {
        &self.data
    }

    /// Index-to-world geometry.
    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// Raw buffer direction matrix.
    pub fn raw_direction(&self) -> &Direction3 {
        &self.raw_direction
    }

    /// Spatial array shape `[k, j, i]`.
    pub fn array_shape(&self) -> [usize; 3] {
        self.data.array_shape()
    }

    /// The transform currently attached but not yet hardened.
    pub fn pending_transform(&self) -> Option<&FrameTransform> {
        self.pending.as_deref()
    }
}

impl<B: Backend> ImageSource<B> for Volume<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn voxels(&self) -> &VolumeData<B> {
        &self.data
    }

    fn array_axis_directions(&self) -> [Vector3; 3] {
        let direction = self.geometry.direction();
        [direction.column(2), direction.column(1), direction.column(0)]
    }

    fn index_to_world(&self) -> Matrix4<f64> {
        self.geometry.index_to_world()
    }

    fn direction(&self) -> Direction3 {
        *self.geometry.direction()
    }

    fn has_pending_transform(&self) -> bool {
        self.pending.is_some()
    }

    fn raw_direction_is_identity(&self) -> bool {
        self.raw_direction.is_identity(RAW_DIRECTION_TOLERANCE)
    }

    fn attach_transform(&mut self, transform: Arc<FrameTransform>) {
        self.pending = Some(transform);
    }

    fn harden_transform(&mut self) -> Result<()> {
        let Some(transform) = self.pending.as_ref() else {
            return Ok(());
        };
        if transform.from_frame() != Frame::World || transform.to_frame() != Frame::World {
            return Err(CoreError::FrameMismatch {
                left: Frame::World,
                right: transform.from_frame(),
            });
        }
        self.geometry = self.geometry.transformed(transform.matrix())?;
        self.pending = None;
        tracing::debug!(volume = %self.name, "hardened transform into geometry");
        Ok(())
    }
}
