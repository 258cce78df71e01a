//! Edge-based closedness checks for triangle solids.

use crate::float_types::{Real, tolerance};
use crate::solid::Solid;
use hashbrown::HashMap;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

/// Snap to a grid of [`tolerance`] spacing so coincident vertices compare equal.
fn quantize_point(p: &Point3<Real>, step: Real) -> QuantizedPoint {
    QuantizedPoint(
        (p.x / step).round() as i64,
        (p.y / step).round() as i64,
        (p.z / step).round() as i64,
    )
}

/// Summary of how the undirected edges of a solid are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManifoldAnalysis {
    /// Whether every edge is used exactly twice, once in each direction
    pub is_manifold: bool,
    /// Distinct undirected edges
    pub edge_count: usize,
    /// Edges used by a single triangle (open boundary)
    pub boundary_edges: usize,
    /// Edges used by more than two triangles
    pub non_manifold_edges: usize,
    /// Edges used twice in the same direction (neighbors with flipped winding)
    pub inconsistent_edges: usize,
}

impl Solid {
    /// Count edge usage after quantizing vertex coordinates.
    ///
    /// An edge `a→b` of one triangle must be matched by `b→a` in exactly one
    /// other triangle for the solid to be closed and consistently oriented.
    pub fn analyze_manifold(&self) -> ManifoldAnalysis {
        // (forward, backward) counts keyed by the ordered endpoint pair
        let mut edge_uses: HashMap<(QuantizedPoint, QuantizedPoint), (u32, u32)> =
            HashMap::with_capacity(self.len() * 3 / 2);

        let step = tolerance();
        for tri in &self.triangles {
            for (a, b) in tri.edges() {
                let (qa, qb) = (quantize_point(&a, step), quantize_point(&b, step));
                if qa < qb {
                    edge_uses.entry((qa, qb)).or_insert((0, 0)).0 += 1;
                } else {
                    edge_uses.entry((qb, qa)).or_insert((0, 0)).1 += 1;
                }
            }
        }

        let mut analysis = ManifoldAnalysis {
            edge_count: edge_uses.len(),
            ..Default::default()
        };
        for &(forward, backward) in edge_uses.values() {
            match forward + backward {
                1 => analysis.boundary_edges += 1,
                2 if forward != backward => analysis.inconsistent_edges += 1,
                2 => {},
                _ => analysis.non_manifold_edges += 1,
            }
        }
        analysis.is_manifold = !self.is_empty()
            && analysis.boundary_edges == 0
            && analysis.non_manifold_edges == 0
            && analysis.inconsistent_edges == 0;

        analysis
    }

    /// Checks if the solid is closed and consistently oriented
    ///
    /// ### Returns
    /// Returns `true` if every edge appears exactly 2 times, in opposite directions
    pub fn is_manifold(&self) -> bool {
        self.analyze_manifold().is_manifold
    }
}
