//! Coordinate frames and the transforms between them.

pub mod frame;
pub mod coronal;
pub mod placement;

pub use frame::{Frame, FrameTransform};
pub use coronal::{
    axial_to_coronal, embed_coronal_2x2, model_grid_to_ras, AXIAL_TO_CORONAL, CORONAL_PLANE_AXES,
};
pub use placement::{compose_placement, PlacementChain};
