//! A single outward-wound triangle of a solid.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Three vertices in millimeters.
///
/// No normal is stored: the outward direction follows from the vertex order
/// by the right-hand rule, so every producer must emit vertices
/// counter-clockwise as seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<Real>; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Build from raw `[x, y, z]` coordinates.
    pub fn from_coords(coords: [[Real; 3]; 3]) -> Self {
        Self {
            vertices: coords.map(|[x, y, z]| Point3::new(x, y, z)),
        }
    }

    /// Unnormalized face normal `(b - a) × (c - a)`.
    #[inline]
    pub fn cross(&self) -> Vector3<Real> {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit outward normal, or `None` for a degenerate triangle.
    pub fn normal(&self) -> Option<Vector3<Real>> {
        self.cross().try_normalize(Real::EPSILON)
    }

    /// The same triangle with opposite winding.
    #[inline]
    pub const fn flipped(&self) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(a, c, b)
    }

    /// Directed edges in winding order: `a→b`, `b→c`, `c→a`.
    pub const fn edges(&self) -> [(Point3<Real>, Point3<Real>); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Contribution of this face to the signed volume of a closed solid
    /// (divergence theorem against the origin).
    #[inline]
    pub fn signed_volume(&self) -> Real {
        let [a, b, c] = self.vertices;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }
}
