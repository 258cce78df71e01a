//! Primitive closed solids.

use crate::float_types::Real;
use crate::solid::{Solid, Triangle};
use nalgebra::Point3;

impl Solid {
    /// An axis-aligned box between the corners `min` and `max`, as 12 outward-wound triangles.
    ///
    /// ```text
    ///   7-------6
    ///   |\      |\
    ///   | 4-------5
    ///   3-|-----2 |
    ///    \|      \|
    ///     0-------1
    /// ```
    ///
    /// ## Faces (quads split from their first corner)
    /// - **Bottom**: [0,3,2,1] (z = min, normal -Z)
    /// - **Top**: [4,5,6,7] (z = max, normal +Z)
    /// - **Front**: [0,1,5,4] (y = min, normal -Y)
    /// - **Back**: [3,7,6,2] (y = max, normal +Y)
    /// - **Left**: [0,4,7,3] (x = min, normal -X)
    /// - **Right**: [1,2,6,5] (x = max, normal +X)
    pub fn cuboid(min: Point3<Real>, max: Point3<Real>) -> Solid {
        let corners = [
            Point3::new(min.x, min.y, min.z), // 0
            Point3::new(max.x, min.y, min.z), // 1: +X
            Point3::new(max.x, max.y, min.z), // 2: +X+Y
            Point3::new(min.x, max.y, min.z), // 3: +Y
            Point3::new(min.x, min.y, max.z), // 4: +Z
            Point3::new(max.x, min.y, max.z), // 5: +X+Z
            Point3::new(max.x, max.y, max.z), // 6: +X+Y+Z
            Point3::new(min.x, max.y, max.z), // 7: +Y+Z
        ];

        const FACES: [[usize; 4]; 6] = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ];

        FACES
            .iter()
            .flat_map(|&[a, b, c, d]| {
                [
                    Triangle::new(corners[a], corners[b], corners[c]),
                    Triangle::new(corners[a], corners[c], corners[d]),
                ]
            })
            .collect()
    }

    /// A box with its minimum corner at `(x, y, z_min)` and the given footprint.
    pub fn box_at(x: Real, y: Real, width: Real, depth: Real, z_min: Real, z_max: Real) -> Solid {
        Self::cuboid(
            Point3::new(x, y, z_min),
            Point3::new(x + width, y + depth, z_max),
        )
    }
}
