pub mod error;
pub mod image;
pub mod orientation;
pub mod spatial;
pub mod transform;

pub use error::{CoreError, Result};
pub use image::{ImageGeometry, ImageSource, Volume, VolumeData};
pub use orientation::{canonical_array, AxisResolver, ResolverConfig};
pub use spatial::{Direction, Point, Spacing, Vector};
pub use transform::{compose_placement, Frame, FrameTransform, PlacementChain};
