//! Labeled-segment resource produced from a model mask.
//!
//! The mask lives on the model grid. Its intrinsic geometry sends that grid
//! into ModelRas; an attached placement then sends ModelRas into the world.
//! Pixels are never resampled.

use std::collections::{BTreeMap, BTreeSet};

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use lungair_core::error::{CoreError, Result};
use lungair_core::spatial::Point3;
use lungair_core::transform::{model_grid_to_ras, Frame, FrameTransform};
use lungair_core::ImageGeometry;

/// One named label of a segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub label: i64,
    pub name: String,
}

/// A label mask with named segments and world placement.
#[derive(Debug, Clone)]
pub struct Segmentation<B: Backend> {
    name: String,
    mask: Tensor<B, 2, Int>,
    segments: Vec<Segment>,
    intrinsic: FrameTransform,
    reference: ImageGeometry,
    placement: Option<FrameTransform>,
}

impl<B: Backend> Segmentation<B> {
    /// Build one segment per distinct label ≥ 1 of `mask`.
    ///
    /// # Arguments
    /// * `mask` - Label per model pixel, `[rows, cols]`
    /// * `names` - Segment name per label; missing labels get a generic name
    /// * `display_name` - Name of the resource
    /// * `reference` - Geometry of the image the mask was computed from
    pub fn from_label_mask(
        mask: Tensor<B, 2, Int>,
        names: &BTreeMap<i64, String>,
        display_name: impl Into<String>,
        reference: &ImageGeometry,
    ) -> Self {
        let labels: BTreeSet<i64> = mask
            .clone()
            .into_data()
            .iter::<i64>()
            .filter(|&label| label >= 1)
            .collect();
        let segments = labels
            .into_iter()
            .map(|label| Segment {
                label,
                name: names
                    .get(&label)
                    .cloned()
                    .unwrap_or_else(|| format!("segment {label}")),
            })
            .collect();

        Self {
            name: display_name.into(),
            mask,
            segments,
            intrinsic: model_grid_to_ras(),
            reference: reference.clone(),
            placement: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask(&self) -> &Tensor<B, 2, Int> {
        &self.mask
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, label: i64) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.label == label)
    }

    /// Model grid to ModelRas.
    pub fn intrinsic(&self) -> &FrameTransform {
        &self.intrinsic
    }

    /// Geometry of the source image.
    pub fn reference_geometry(&self) -> &ImageGeometry {
        &self.reference
    }

    /// ModelRas to World, once attached.
    pub fn placement(&self) -> Option<&FrameTransform> {
        self.placement.as_ref()
    }

    /// Place the segmentation in the world without touching its pixels.
    ///
    /// # Errors
    /// [`CoreError::FrameMismatch`] unless `placement` maps ModelRas to World.
    pub fn attach_transform(&mut self, placement: FrameTransform) -> Result<()> {
        if placement.from_frame() != Frame::ModelRas {
            return Err(CoreError::FrameMismatch {
                left: self.intrinsic.to_frame(),
                right: placement.from_frame(),
            });
        }
        if placement.to_frame() != Frame::World {
            return Err(CoreError::FrameMismatch {
                left: placement.to_frame(),
                right: Frame::World,
            });
        }
        self.placement = Some(placement);
        Ok(())
    }

    /// Model grid to World, `placement · intrinsic`.
    pub fn world_transform(&self) -> Option<FrameTransform> {
        self.placement
            .as_ref()
            .and_then(|placement| self.intrinsic.then(placement).ok())
    }

    /// World position of a model pixel `(row, col)`.
    pub fn pixel_to_world(&self, row: f64, col: f64) -> Option<Point3> {
        self.world_transform()
            .map(|t| t.transform_point(&Point3::new([row, col, 0.0])))
    }
}
