//! A trait for any shape which can be represented by triangles

use crate::solid::{Solid, Triangle};

/// A triangulated 3D surface.
///
/// Anything that can present itself as a sequence of wound triangles can use
/// the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle, in order.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut(&Triangle);

    /// Number of triangles `visit_triangles` will produce.
    fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.visit_triangles(|_| count += 1);
        count
    }
}

impl Triangulated3D for Solid {
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut(&Triangle),
    {
        self.triangles.iter().for_each(f);
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }
}

impl Triangulated3D for [Triangle] {
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut(&Triangle),
    {
        self.iter().for_each(f);
    }
}
