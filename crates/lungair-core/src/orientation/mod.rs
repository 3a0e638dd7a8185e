//! Axis discovery for single-slice radiographs.

pub mod config;
pub mod matcher;
pub mod resolver;

pub use config::{MatcherKind, ResolverConfig};
pub use matcher::{AngularMatcher, ComponentwiseMatcher, DirectionMatcher, INFERIOR, LEFT};
pub use resolver::{canonical_array, AxisAssignment, AxisResolver};
