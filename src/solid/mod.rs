//! `Solid`: an ordered list of independently owned triangles, and the
//! composition of several solids into one.

use crate::aabb::Aabb;
use crate::float_types::Real;

mod triangle;
pub use triangle::Triangle;

#[cfg(feature = "hashmap")]
pub mod manifold;

/// A triangle soup meant to describe a closed solid.
///
/// Triangles do not share vertices; each carries its own three points, just
/// like the binary STL layout. Closedness (every edge used by exactly two
/// triangles with opposite winding) is upheld by the builders, not by this
/// type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solid {
    pub triangles: Vec<Triangle>,
}

impl Solid {
    pub const fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Number of triangles (faces).
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Three per triangle, since vertices are never shared.
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append a copy of every triangle of `other`, keeping its order.
    pub fn extend_from(&mut self, other: &Solid) {
        self.triangles.extend_from_slice(&other.triangles);
    }

    /// Concatenate solids in argument order.
    ///
    /// No welding, deduplication or intersection handling happens: the result
    /// has exactly `sum(len)` triangles and overlapping closed parts stay
    /// overlapping.
    ///
    /// ```
    /// # use layerforge::solid::{Solid, Triangle};
    /// let t = Triangle::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    /// let a = Solid::from_triangles(vec![t, t]);
    /// let b = Solid::from_triangles(vec![t.flipped()]);
    /// assert_eq!(Solid::combine(&[&a, &b]).len(), 3);
    /// ```
    pub fn combine(solids: &[&Solid]) -> Solid {
        let total = solids.iter().map(|s| s.len()).sum();
        let mut combined = Solid::with_capacity(total);
        for solid in solids {
            combined.extend_from(solid);
        }
        combined
    }

    /// Bounds of all vertices, or `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.triangles.iter().flat_map(|t| t.vertices.iter()))
    }

    /// Enclosed volume for a closed solid; positive when faces wind outward.
    pub fn signed_volume(&self) -> Real {
        self.triangles.iter().map(Triangle::signed_volume).sum()
    }
}

impl FromIterator<Triangle> for Solid {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Solid::from_triangles(iter.into_iter().collect())
    }
}

impl FromIterator<Solid> for Solid {
    fn from_iter<I: IntoIterator<Item = Solid>>(iter: I) -> Self {
        let mut combined = Solid::new();
        for solid in iter {
            combined.triangles.extend(solid.triangles);
        }
        combined
    }
}

impl Extend<Triangle> for Solid {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

impl IntoIterator for Solid {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}

impl<'a> IntoIterator for &'a Solid {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
