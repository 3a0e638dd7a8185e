//! Direction matching against anatomical axes.

use crate::spatial::Vector3;

/// Patient left in RAS.
pub const LEFT: [f64; 3] = [-1.0, 0.0, 0.0];

/// Patient inferior in RAS.
pub const INFERIOR: [f64; 3] = [0.0, 0.0, -1.0];

/// Decides whether an array-axis direction points along an anatomical axis.
pub trait DirectionMatcher: std::fmt::Debug {
    /// Whether `direction` is considered to point along `target`.
    fn matches(&self, direction: &Vector3, target: &Vector3) -> bool;
}

/// Signed componentwise test: `direction[i] - target[i] < epsilon` for every `i`.
///
/// The test is one-sided. Any direction whose components all lie at or below
/// the target's (plus epsilon) passes, so a vector such as `(-1, -0.5, -0.5)`
/// is accepted as Left. Exact axis alignment of the input is assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentwiseMatcher {
    pub epsilon: f64,
}

impl ComponentwiseMatcher {
    pub const DEFAULT_EPSILON: f64 = 1e-5;

    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for ComponentwiseMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPSILON)
    }
}

impl DirectionMatcher for ComponentwiseMatcher {
    fn matches(&self, direction: &Vector3, target: &Vector3) -> bool {
        (0..3).all(|i| direction[i] - target[i] < self.epsilon)
    }
}

/// Matches when the angle between the two directions is within `max_angle` radians.
///
/// Zero-length directions never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularMatcher {
    pub max_angle: f64,
}

impl AngularMatcher {
    pub const DEFAULT_MAX_ANGLE: f64 = 1e-3;

    pub fn new(max_angle: f64) -> Self {
        Self { max_angle }
    }
}

impl Default for AngularMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ANGLE)
    }
}

impl DirectionMatcher for AngularMatcher {
    fn matches(&self, direction: &Vector3, target: &Vector3) -> bool {
        let norms = direction.norm() * target.norm();
        if norms < f64::EPSILON {
            return false;
        }
        let cosine = (direction.dot(target) / norms).clamp(-1.0, 1.0);
        cosine.acos() <= self.max_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> Vector3 {
        Vector3::new(LEFT)
    }

    #[test]
    fn test_componentwise_exact_match() {
        let matcher = ComponentwiseMatcher::default();
        assert!(matcher.matches(&left(), &left()));
        assert!(!matcher.matches(&Vector3::new([1.0, 0.0, 0.0]), &left()));
        assert!(!matcher.matches(&Vector3::new(INFERIOR), &left()));
    }

    #[test]
    fn test_componentwise_is_signed() {
        let matcher = ComponentwiseMatcher::default();
        // Every component at or below Left's passes the one-sided test.
        assert!(matcher.matches(&Vector3::new([-1.0, -0.5, -0.5]), &left()));
        assert!(matcher.matches(&Vector3::new([-2.0, 0.0, 0.0]), &left()));
        // A small positive excess fails.
        assert!(!matcher.matches(&Vector3::new([-1.0, 2e-5, 0.0]), &left()));
    }

    #[test]
    fn test_angular_rejects_oblique() {
        let matcher = AngularMatcher::default();
        assert!(matcher.matches(&left(), &left()));
        assert!(matcher.matches(&Vector3::new([-2.0, 0.0, 0.0]), &left()));
        assert!(!matcher.matches(&Vector3::new([-1.0, -0.5, -0.5]), &left()));
        assert!(!matcher.matches(&Vector3::zeros(), &left()));
    }
}
