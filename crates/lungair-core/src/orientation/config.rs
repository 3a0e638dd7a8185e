//! Axis resolver configuration.

use serde::{Deserialize, Serialize};

use super::matcher::{AngularMatcher, ComponentwiseMatcher, DirectionMatcher};

/// Which direction test the resolver applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatcherKind {
    /// Signed componentwise comparison.
    Componentwise,
    /// Angle between directions.
    Angular,
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Direction test.
    pub matcher: MatcherKind,
    /// Epsilon for [`MatcherKind::Componentwise`], radians for [`MatcherKind::Angular`].
    pub tolerance: f64,
    /// Warn when the raw voxel buffer direction is not the identity.
    pub warn_on_raw_direction: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::Componentwise,
            tolerance: ComponentwiseMatcher::DEFAULT_EPSILON,
            warn_on_raw_direction: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the angular matcher with the given maximum angle in radians.
    pub fn with_angular_matcher(mut self, max_angle: f64) -> Self {
        self.matcher = MatcherKind::Angular;
        self.tolerance = max_angle;
        self
    }

    /// Set the matcher tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Silence the raw-direction warning.
    pub fn without_raw_direction_warning(mut self) -> Self {
        self.warn_on_raw_direction = false;
        self
    }

    pub(crate) fn build_matcher(&self) -> Box<dyn DirectionMatcher + Send + Sync> {
        match self.matcher {
            MatcherKind::Componentwise => Box::new(ComponentwiseMatcher::new(self.tolerance)),
            MatcherKind::Angular => Box::new(AngularMatcher::new(self.tolerance)),
        }
    }
}
