//! Placement of a segmentation-model output in world space.
//!
//! The placement is built in stages so that every intermediate frame stays
//! available for inspection:
//!
//! ```text
//! ModelRas --in_plane--> ArrayRas --direction⁻¹--> ArrayIndex --index_to_world--> World
//! ```

use nalgebra::{Matrix2, Matrix4};

use super::coronal::embed_coronal_2x2;
use super::frame::{Frame, FrameTransform};
use crate::error::{CoreError, Result};
use crate::spatial::{Direction3, Point3};

/// All stages of a model-to-world placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementChain {
    in_plane: FrameTransform,
    array_direction: FrameTransform,
    array_direction_inverse: FrameTransform,
    index_to_world: FrameTransform,
    array_ras_to_world: FrameTransform,
    placement: FrameTransform,
}

impl PlacementChain {
    /// Build every stage of the placement.
    ///
    /// # Arguments
    /// * `model_to_array` - 2×2 map from the model pixel grid onto the canonical
    ///   image pixel grid, in (row, column) coordinates
    /// * `index_to_world` - 4×4 index-to-world affine of the source image
    /// * `direction` - direction matrix of the source image (columns are the
    ///   world directions of the i, j, k index axes)
    ///
    /// # Errors
    /// [`CoreError::SingularTransform`] if `direction` is not orthonormal or
    /// cannot be inverted.
    pub fn compose(
        model_to_array: &Matrix2<f64>,
        index_to_world: &Matrix4<f64>,
        direction: &Direction3,
    ) -> Result<Self> {
        // 1-2. Model grid embedded into the coronal plane.
        let in_plane = FrameTransform::new(
            Frame::ModelRas,
            Frame::ArrayRas,
            embed_coronal_2x2(model_to_array),
        );

        // 3. ArrayRas -> ArrayIndex, exact inverse of the direction matrix.
        if !direction.is_orthogonal() {
            return Err(CoreError::singular(format!(
                "direction matrix is not orthonormal: {:?}",
                direction.inner()
            )));
        }
        let array_direction = FrameTransform::new(
            Frame::ArrayIndex,
            Frame::ArrayRas,
            direction.to_homogeneous(),
        );
        let array_direction_inverse = array_direction.inverse()?;

        // 4. ArrayRas -> World.
        let index_to_world = FrameTransform::new(Frame::ArrayIndex, Frame::World, *index_to_world);
        let array_ras_to_world = array_direction_inverse.then(&index_to_world)?;

        // 5. ModelRas -> World.
        let placement = in_plane.then(&array_ras_to_world)?;

        tracing::debug!(placement = ?placement.matrix(), "composed model placement");

        Ok(Self {
            in_plane,
            array_direction,
            array_direction_inverse,
            index_to_world,
            array_ras_to_world,
            placement,
        })
    }

    /// ModelRas -> ArrayRas, the embedded 2×2 map.
    pub fn in_plane(&self) -> &FrameTransform {
        &self.in_plane
    }

    /// ArrayIndex -> ArrayRas.
    pub fn array_direction(&self) -> &FrameTransform {
        &self.array_direction
    }

    /// ArrayRas -> ArrayIndex.
    pub fn array_direction_inverse(&self) -> &FrameTransform {
        &self.array_direction_inverse
    }

    /// ArrayIndex -> World.
    pub fn index_to_world(&self) -> &FrameTransform {
        &self.index_to_world
    }

    /// ArrayRas -> World.
    pub fn array_ras_to_world(&self) -> &FrameTransform {
        &self.array_ras_to_world
    }

    /// ModelRas -> World, the final placement.
    pub fn placement(&self) -> &FrameTransform {
        &self.placement
    }

    /// The elementary stages a point passes through, in application order.
    pub fn stages(&self) -> [&FrameTransform; 3] {
        [&self.in_plane, &self.array_direction_inverse, &self.index_to_world]
    }

    /// Rebuild the placement from the stored elementary stages.
    pub fn recompose(&self) -> Result<FrameTransform> {
        let [first, second, third] = self.stages();
        first.then(second)?.then(third)
    }

    /// Push a point through each stage in turn.
    pub fn transform_point_stepwise(&self, point: &Point3) -> Point3 {
        self.stages()
            .iter()
            .fold(*point, |p, stage| stage.transform_point(&p))
    }
}

/// Compose the ModelRas -> World placement matrix.
///
/// See [`PlacementChain::compose`] for the stages and failure modes.
pub fn compose_placement(
    model_to_array: &Matrix2<f64>,
    index_to_world: &Matrix4<f64>,
    direction: &Direction3,
) -> Result<Matrix4<f64>> {
    PlacementChain::compose(model_to_array, index_to_world, direction)
        .map(|chain| *chain.placement().matrix())
}
