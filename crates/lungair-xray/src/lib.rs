pub mod collection;
pub mod display;
pub mod error;
pub mod scene;
pub mod segmentation;
pub mod xray;

pub use collection::XrayCollection;
pub use display::{Display, DisplayEvent, DisplayLog, XrayView};
pub use error::{Result, XrayError};
pub use scene::{MemoryScene, NodeId, NodeKind, Scene};
pub use segmentation::{Segment, Segmentation};
pub use xray::{SharedTransform, Xray};
