//! Display collaborator contract.

use crate::scene::NodeId;

/// The two slice views radiographs are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrayView {
    /// Plain radiograph view.
    Xray,
    /// Radiograph view with overlaid features such as segmentations.
    XrayFeatures,
}

impl XrayView {
    pub const ALL: [XrayView; 2] = [Self::Xray, Self::XrayFeatures];
}

/// Receives the visibility decisions of the collection.
pub trait Display {
    /// Make `node` the background image of `view`.
    fn show_image(&mut self, view: XrayView, node: NodeId);

    /// Show or hide a segmentation.
    fn set_segmentation_visibility(&mut self, node: NodeId, visible: bool);

    /// Limit a segmentation to appear only in `view`.
    fn restrict_to_view(&mut self, node: NodeId, view: XrayView);
}

/// A display call, as recorded by [`DisplayLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    ShowImage { view: XrayView, node: NodeId },
    SegmentationVisibility { node: NodeId, visible: bool },
    RestrictToView { node: NodeId, view: XrayView },
}

/// Display that records every call.
#[derive(Debug, Clone, Default)]
pub struct DisplayLog {
    events: Vec<DisplayEvent>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Background image last shown in `view`.
    pub fn shown_image(&self, view: XrayView) -> Option<NodeId> {
        self.events.iter().rev().find_map(|event| match *event {
            DisplayEvent::ShowImage { view: v, node } if v == view => Some(node),
            _ => None,
        })
    }

    /// Last visibility set for a segmentation node.
    pub fn segmentation_visible(&self, node: NodeId) -> Option<bool> {
        self.events.iter().rev().find_map(|event| match *event {
            DisplayEvent::SegmentationVisibility { node: n, visible } if n == node => Some(visible),
            _ => None,
        })
    }

    /// Views a segmentation node has been restricted to.
    pub fn restrictions(&self, node: NodeId) -> Vec<XrayView> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                DisplayEvent::RestrictToView { node: n, view } if n == node => Some(view),
                _ => None,
            })
            .collect()
    }
}

impl Display for DisplayLog {
    fn show_image(&mut self, view: XrayView, node: NodeId) {
        self.events.push(DisplayEvent::ShowImage { view, node });
    }

    fn set_segmentation_visibility(&mut self, node: NodeId, visible: bool) {
        self.events
            .push(DisplayEvent::SegmentationVisibility { node, visible });
    }

    fn restrict_to_view(&mut self, node: NodeId, view: XrayView) {
        self.events.push(DisplayEvent::RestrictToView { node, view });
    }
}
