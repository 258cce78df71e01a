//! Serialization of solids and the summary statistics reported alongside.

#[cfg(feature = "stl-io")]
pub mod stl;

use crate::errors::{LayerforgeError, Result};
use crate::float_types::Real;
use crate::solid::Solid;
use crate::triangulated::Triangulated3D;

/// Face/vertex counts and per-axis bounds of a written solid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshStats {
    pub face_count: usize,
    /// Always `3 * face_count`: vertices are not shared between triangles
    pub vertex_count: usize,
    pub min: [Real; 3],
    pub max: [Real; 3],
}

impl MeshStats {
    /// ## Errors
    /// `EmptyMesh` when `shape` has no triangles.
    pub fn of<T: Triangulated3D + ?Sized>(shape: &T) -> Result<Self> {
        let mut face_count = 0;
        let mut min = [Real::INFINITY; 3];
        let mut max = [Real::NEG_INFINITY; 3];
        shape.visit_triangles(|tri| {
            face_count += 1;
            for v in &tri.vertices {
                for axis in 0..3 {
                    min[axis] = min[axis].min(v[axis]);
                    max[axis] = max[axis].max(v[axis]);
                }
            }
        });
        if face_count == 0 {
            return Err(LayerforgeError::EmptyMesh);
        }
        Ok(Self {
            face_count,
            vertex_count: face_count * 3,
            min,
            max,
        })
    }

    /// Per-axis `max - min`.
    pub fn size(&self) -> [Real; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

impl Solid {
    pub fn stats(&self) -> Result<MeshStats> {
        MeshStats::of(self)
    }
}
