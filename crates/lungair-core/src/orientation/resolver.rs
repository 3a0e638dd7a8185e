//! Recovery of the canonical 2D array from a single-slice volume.
//!
//! The canonical array has its rows running patient-inferior and its columns
//! running patient-left. The source volume may store those axes in any array
//! position; the one remaining axis must be a single slice.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::config::ResolverConfig;
use super::matcher::{DirectionMatcher, INFERIOR, LEFT};
use crate::error::{CoreError, Result};
use crate::image::{ImageSource, VolumeData};
use crate::spatial::Vector3;

/// Array axis positions found for the anatomical directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisAssignment {
    pub left: usize,
    pub inferior: usize,
    pub other: usize,
}

impl AxisAssignment {
    /// Axis order of the canonical layout: `(other, inferior, left)`.
    pub fn permutation(&self) -> [usize; 3] {
        [self.other, self.inferior, self.left]
    }
}

/// Finds the left and inferior array axes and relabels the array accordingly.
#[derive(Debug)]
pub struct AxisResolver {
    matcher: Box<dyn DirectionMatcher + Send + Sync>,
    warn_on_raw_direction: bool,
}

impl Default for AxisResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl AxisResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            matcher: config.build_matcher(),
            warn_on_raw_direction: config.warn_on_raw_direction,
        }
    }

    /// Replace the direction matcher; the raw-direction warning setting is kept.
    pub fn with_matcher(mut self, matcher: impl DirectionMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// The direction test in use.
    pub fn matcher(&self) -> &(dyn DirectionMatcher + Send + Sync) {
        self.matcher.as_ref()
    }

    pub fn warns_on_raw_direction(&self) -> bool {
        self.warn_on_raw_direction
    }

    /// Assign array axes to Left and Inferior.
    ///
    /// Axes are visited in order. An axis matching Left is taken as the left
    /// axis; otherwise one matching Inferior is taken as the inferior axis. A
    /// later match replaces an earlier one.
    ///
    /// # Arguments
    /// * `directions` - World direction of each array axis
    /// * `shape` - Array extents, used to check the slice axis
    pub fn resolve_axes(&self, directions: &[Vector3; 3], shape: [usize; 3]) -> Result<AxisAssignment> {
        let left_target = Vector3::new(LEFT);
        let inferior_target = Vector3::new(INFERIOR);

        let mut left = None;
        let mut inferior = None;
        for (axis, direction) in directions.iter().enumerate() {
            if self.matcher.matches(direction, &left_target) {
                left = Some(axis);
            } else if self.matcher.matches(direction, &inferior_target) {
                inferior = Some(axis);
            }
        }

        let left = left.ok_or_else(|| {
            CoreError::orientation(format!(
                "no array axis points left; axis directions {:?}",
                directions.iter().map(|d| d.to_vec()).collect::<Vec<_>>()
            ))
        })?;
        let inferior = inferior.ok_or_else(|| {
            CoreError::orientation(format!(
                "no array axis points inferior; axis directions {:?}",
                directions.iter().map(|d| d.to_vec()).collect::<Vec<_>>()
            ))
        })?;
        // An axis that matches Left is never tested against Inferior.
        debug_assert_ne!(left, inferior);

        let other = 3 - left - inferior;
        if shape[other] != 1 {
            return Err(CoreError::Size {
                axis: other,
                extent: shape[other],
            });
        }

        tracing::debug!(left, inferior, other, "resolved array axes");
        Ok(AxisAssignment { left, inferior, other })
    }

    /// Relabel a `[a0, a1, a2]` array into `[inferior, left]`.
    ///
    /// Values are moved, never interpolated.
    pub fn resolve<B: Backend>(&self, array: Tensor<B, 3>, directions: &[Vector3; 3]) -> Result<Tensor<B, 2>> {
        let assignment = self.resolve_axes(directions, array.dims())?;
        let permuted = permute_axes(array, assignment.permutation());
        let [_, rows, cols] = permuted.dims();
        Ok(permuted.reshape([rows, cols]))
    }
}

/// Reorder the axes so that output axis `p` is input axis `order[p]`.
fn permute_axes<B: Backend>(mut tensor: Tensor<B, 3>, order: [usize; 3]) -> Tensor<B, 3> {
    let mut current = [0, 1, 2];
    for position in 0..3 {
        let found = current
            .iter()
            .position(|&axis| axis == order[position])
            .unwrap_or(position);
        if found != position {
            tensor = tensor.swap_dims(position, found);
            current.swap(position, found);
        }
    }
    tensor
}

/// Canonical `[inferior, left]` array of an image source.
///
/// Fails if a transform is still pending on the source. A non-identity raw
/// buffer direction is only reported. Three-component data is averaged to
/// grayscale; any other component count is rejected.
pub fn canonical_array<B, S>(source: &S, resolver: &AxisResolver) -> Result<Tensor<B, 2>>
where
    B: Backend,
    S: ImageSource<B> + ?Sized,
{
    if source.has_pending_transform() {
        return Err(CoreError::precheck(
            source.name(),
            "a transform is attached but not hardened",
        ));
    }
    if resolver.warns_on_raw_direction() && !source.raw_direction_is_identity() {
        tracing::warn!(
            volume = source.name(),
            "raw image direction is not the identity; array axis directions may be wrong"
        );
    }

    let scalar = match source.voxels() {
        VolumeData::Scalar(data) => data.clone(),
        VolumeData::Multi(data) => {
            let [k, j, i, components] = data.dims();
            if components != 3 {
                return Err(CoreError::UnsupportedComponents(components));
            }
            tracing::info!(volume = source.name(), "averaging color channels to grayscale");
            data.clone().mean_dim(3).reshape([k, j, i])
        }
    };

    resolver.resolve(scalar, &source.array_axis_directions())
}
