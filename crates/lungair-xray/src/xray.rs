//! A single chest radiograph and its segmentation.

use std::sync::Arc;

use burn::tensor::backend::Backend;

use lungair_core::orientation::{canonical_array, AxisResolver};
use lungair_core::transform::{FrameTransform, PlacementChain};
use lungair_core::{ImageSource, Volume};
use lungair_model::Inference;

use crate::error::Result;
use crate::scene::{NodeId, NodeKind, Scene};
use crate::segmentation::Segmentation;

/// World-to-world orientation applied to every loaded radiograph.
pub type SharedTransform = Arc<FrameTransform>;

/// A loaded radiograph.
///
/// Starts unsegmented; [`Xray::add_segmentation`] moves it to segmented,
/// after which further calls do nothing.
#[derive(Debug)]
pub struct Xray<B: Backend> {
    name: String,
    volume: Volume<B>,
    volume_node: NodeId,
    segmentation: Option<Segmentation<B>>,
    segmentation_node: Option<NodeId>,
    placement: Option<PlacementChain>,
    transform_node: Option<NodeId>,
}

impl<B: Backend> Xray<B> {
    /// Take ownership of a loaded volume, orient it and register it with the scene.
    ///
    /// `orientation` is attached to the volume and hardened into its geometry.
    pub fn new<S>(
        name: impl Into<String>,
        mut volume: Volume<B>,
        orientation: &SharedTransform,
        scene: &mut S,
    ) -> Result<Self>
    where
        S: Scene + ?Sized,
    {
        let name = name.into();
        volume.attach_transform(Arc::clone(orientation));
        volume.harden_transform()?;
        let volume_node = scene.add_node(NodeKind::Volume, &name);

        tracing::debug!(xray = %name, node = %volume_node, "created x-ray");
        Ok(Self {
            name,
            volume,
            volume_node,
            segmentation: None,
            segmentation_node: None,
            placement: None,
            transform_node: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume(&self) -> &Volume<B> {
        &self.volume
    }

    pub fn volume_node(&self) -> NodeId {
        self.volume_node
    }

    pub fn has_segmentation(&self) -> bool {
        self.segmentation.is_some()
    }

    pub fn segmentation(&self) -> Option<&Segmentation<B>> {
        self.segmentation.as_ref()
    }

    pub fn segmentation_node(&self) -> Option<NodeId> {
        self.segmentation_node
    }

    /// Every stage of the model-to-world placement, once segmented.
    pub fn placement(&self) -> Option<&PlacementChain> {
        self.placement.as_ref()
    }

    pub fn transform_node(&self) -> Option<NodeId> {
        self.transform_node
    }

    /// Segment with the default axis resolver. See [`Xray::add_segmentation_with`].
    pub fn add_segmentation<I, S>(&mut self, inference: &I, scene: &mut S) -> Result<()>
    where
        I: Inference<B> + ?Sized,
        S: Scene + ?Sized,
    {
        self.add_segmentation_with(inference, &AxisResolver::default(), scene)
    }

    /// Run inference on this radiograph and place the result in the world.
    ///
    /// Does nothing if already segmented. Scene nodes are added only once
    /// every fallible step has succeeded, so a failure leaves the x-ray
    /// unsegmented and the scene unchanged.
    pub fn add_segmentation_with<I, S>(
        &mut self,
        inference: &I,
        resolver: &AxisResolver,
        scene: &mut S,
    ) -> Result<()>
    where
        I: Inference<B> + ?Sized,
        S: Scene + ?Sized,
    {
        if self.has_segmentation() {
            tracing::debug!(xray = %self.name, "already segmented");
            return Ok(());
        }

        let image = canonical_array(&self.volume, resolver)?;
        let output = inference.infer(image)?;

        let mut segmentation = Segmentation::from_label_mask(
            output.mask,
            &output.segment_names,
            format!("LungAIR Seg: {}", self.name),
            self.volume.geometry(),
        );
        let chain = PlacementChain::compose(
            &output.model_to_image,
            &self.volume.index_to_world(),
            &self.volume.direction(),
        )?;
        segmentation.attach_transform(chain.placement().clone())?;

        let segmentation_node = scene.add_node(NodeKind::Segmentation, segmentation.name());
        let transform_node = scene.add_node(
            NodeKind::Transform,
            &format!("LungAIR model to image transform: {}", self.name),
        );

        tracing::info!(
            xray = %self.name,
            segments = segmentation.segments().len(),
            "added segmentation"
        );
        self.segmentation = Some(segmentation);
        self.segmentation_node = Some(segmentation_node);
        self.placement = Some(chain);
        self.transform_node = Some(transform_node);
        Ok(())
    }

    /// Release every scene node this x-ray owns.
    pub fn delete<S>(self, scene: &mut S)
    where
        S: Scene + ?Sized,
    {
        scene.remove_node(self.volume_node);
        for node in [self.segmentation_node, self.transform_node].into_iter().flatten() {
            scene.remove_node(node);
        }
        tracing::debug!(xray = %self.name, "deleted x-ray");
    }
}
