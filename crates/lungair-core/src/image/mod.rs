//! Image resources and the image-source contract.

pub mod geometry;
pub mod source;
pub mod volume;

pub use geometry::ImageGeometry;
pub use source::ImageSource;
pub use volume::{Volume, VolumeData};
