//! Spacing between adjacent voxels along each image axis.

use super::Vector;

/// Physical distance between adjacent voxels along each index axis.
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Create uniform spacing (same value for all dimensions).
    pub fn uniform(value: f64) -> Self {
        Vector::new([value; D])
    }

    /// Check that every component is strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|s| s.is_finite() && *s > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Spacing3 = Spacing<3>;

    #[test]
    fn test_spacing_uniform() {
        let s = Spacing3::uniform(0.5);
        assert_eq!(s, Spacing3::new([0.5, 0.5, 0.5]));
        assert!(s.is_valid());
    }

    #[test]
    fn test_spacing_invalid() {
        assert!(!Spacing3::new([1.0, 0.0, 1.0]).is_valid());
        assert!(!Spacing3::new([1.0, f64::NAN, 1.0]).is_valid());
    }
}
