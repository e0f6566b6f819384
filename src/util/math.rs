//! Math type re-exports and the ZF3D bounding volume.
//!
//! Vector and matrix types come from `glam`; ZF3D stores node bounds as a
//! box plus an enclosing sphere, modelled by [`Bounds`].

pub use glam::{Mat4, Vec2, Vec3};

use serde::Serialize;
use std::fmt;

/// Node bounding volume: axis-aligned box plus enclosing sphere.
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
}

impl Bounds {
    /// Empty bounds (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
        center: Vec3::ZERO,
        radius: 0.0,
    };

    /// Create bounds from explicit parts.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3, center: Vec3, radius: f32) -> Self {
        Self { min, max, center, radius }
    }

    /// Compute bounds enclosing a set of points.
    ///
    /// The sphere is centered on the box and reaches the farthest point.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut b = Self::EMPTY;
        for &p in points {
            b.min = b.min.min(p);
            b.max = b.max.max(p);
        }
        if b.is_empty() {
            return b;
        }
        b.center = (b.min + b.max) * 0.5;
        b.radius = points
            .iter()
            .map(|p| p.distance(b.center))
            .fold(0.0, f32::max);
        b
    }

    /// Check if these bounds are empty (contain no points).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bounds({:?} - {:?}, c={:?}, r={})",
            self.min, self.max, self.center, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let b = Bounds::from_points(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.center, Vec3::ZERO);
        assert_eq!(b.radius, 1.0);
        assert_eq!(b.size(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounds_empty() {
        let b = Bounds::from_points(&[]);
        assert!(b.is_empty());
        assert_eq!(b.radius, 0.0);
    }
}
