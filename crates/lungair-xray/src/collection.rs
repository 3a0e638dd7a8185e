//! Named x-rays with a single selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use burn::tensor::backend::Backend;

use lungair_core::orientation::AxisResolver;
use lungair_core::transform::axial_to_coronal;
use lungair_core::Volume;
use lungair_model::Inference;

use crate::display::{Display, XrayView};
use crate::error::{Result, XrayError};
use crate::scene::Scene;
use crate::xray::{SharedTransform, Xray};

/// X-rays keyed by unique name, at most one of them selected.
///
/// Owns the display and scene collaborators and the orientation transform
/// shared by all of its x-rays.
#[derive(Debug)]
pub struct XrayCollection<B: Backend, D, S> {
    xrays: BTreeMap<String, Xray<B>>,
    selected_name: Option<String>,
    display: D,
    scene: S,
    orientation: SharedTransform,
    resolver: AxisResolver,
}

impl<B, D, S> XrayCollection<B, D, S>
where
    B: Backend,
    D: Display,
    S: Scene,
{
    pub fn new(display: D, scene: S) -> Self {
        Self {
            xrays: BTreeMap::new(),
            selected_name: None,
            display,
            scene,
            orientation: Arc::new(axial_to_coronal()),
            resolver: AxisResolver::default(),
        }
    }

    /// Use `resolver` to recover canonical images before segmentation.
    pub fn with_resolver(mut self, resolver: AxisResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Orientation transform attached to every x-ray created here.
    pub fn orientation(&self) -> &SharedTransform {
        &self.orientation
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Wrap a loaded volume into an x-ray registered with this collection's scene.
    ///
    /// The x-ray is not inserted; see [`XrayCollection::insert_many`].
    pub fn create_xray(&mut self, name: impl Into<String>, volume: Volume<B>) -> Result<Xray<B>> {
        Xray::new(name, volume, &self.orientation, &mut self.scene)
    }

    /// Create an x-ray from `volume` and insert it.
    pub fn load(&mut self, name: impl Into<String>, volume: Volume<B>) -> Result<()> {
        let xray = self.create_xray(name, volume)?;
        self.insert_many([xray])
    }

    /// Insert x-rays in order.
    ///
    /// Stops at the first name already present: x-rays inserted before it
    /// stay, it and everything after it are deleted.
    pub fn insert_many(&mut self, xrays: impl IntoIterator<Item = Xray<B>>) -> Result<()> {
        let mut xrays = xrays.into_iter();
        while let Some(xray) = xrays.next() {
            if self.xrays.contains_key(xray.name()) {
                let name = xray.name().to_string();
                tracing::warn!(xray = %name, "duplicate x-ray name; dropping the rest of the batch");
                xray.delete(&mut self.scene);
                for rest in xrays {
                    rest.delete(&mut self.scene);
                }
                return Err(XrayError::DuplicateName(name));
            }
            self.xrays.insert(xray.name().to_string(), xray);
        }
        Ok(())
    }

    /// Select `name`, hiding the previous selection's segmentation and
    /// showing the new one's.
    pub fn select(&mut self, name: &str) -> Result<()> {
        let Some(next) = self.xrays.get(name) else {
            return Err(XrayError::not_found(name));
        };

        if let Some(node) = self
            .selected_name
            .as_ref()
            .and_then(|previous| self.xrays.get(previous))
            .and_then(Xray::segmentation_node)
        {
            self.display.set_segmentation_visibility(node, false);
        }

        if let Some(node) = next.segmentation_node() {
            self.display.restrict_to_view(node, XrayView::XrayFeatures);
            self.display.set_segmentation_visibility(node, true);
        }
        for view in XrayView::ALL {
            self.display.show_image(view, next.volume_node());
        }

        tracing::debug!(xray = %name, "selected x-ray");
        self.selected_name = Some(name.to_string());
        Ok(())
    }

    /// Segment the selected x-ray and make its segmentation the only visible one.
    pub fn segment_selected<I>(&mut self, inference: &I) -> Result<()>
    where
        I: Inference<B> + ?Sized,
    {
        let name = self.selected_name.clone().ok_or(XrayError::NoSelection)?;
        let xray = self
            .xrays
            .get_mut(&name)
            .ok_or_else(|| XrayError::not_found(&name))?;
        xray.add_segmentation_with(inference, &self.resolver, &mut self.scene)?;

        for (other, xray) in &self.xrays {
            if let Some(node) = xray.segmentation_node() {
                if *other != name {
                    self.display.set_segmentation_visibility(node, false);
                }
            }
        }
        if let Some(node) = self.xrays.get(&name).and_then(Xray::segmentation_node) {
            self.display.restrict_to_view(node, XrayView::XrayFeatures);
            self.display.set_segmentation_visibility(node, true);
        }
        Ok(())
    }

    /// Remove one x-ray and release its resources, clearing the selection if it was selected.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let xray = self
            .xrays
            .remove(name)
            .ok_or_else(|| XrayError::not_found(name))?;
        if self.selected_name.as_deref() == Some(name) {
            self.selected_name = None;
        }
        xray.delete(&mut self.scene);
        Ok(())
    }

    /// Delete every x-ray, reset the selection and prune unused subjects.
    pub fn clear(&mut self) {
        self.selected_name = None;
        let xrays = std::mem::take(&mut self.xrays);
        let count = xrays.len();
        for xray in xrays.into_values() {
            xray.delete(&mut self.scene);
        }
        self.scene.prune_unused_subjects();
        tracing::info!(count, "cleared x-ray collection");
    }

    pub fn get(&self, name: &str) -> Option<&Xray<B>> {
        self.xrays.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.xrays.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.xrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xrays.is_empty()
    }

    /// Names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.xrays.keys().map(String::as_str)
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    pub fn selected(&self) -> Option<&Xray<B>> {
        self.selected_name
            .as_ref()
            .and_then(|name| self.xrays.get(name))
    }
}
