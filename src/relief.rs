//! Triangulation of a [`HeightField`] into a closed relief solid: a top
//! surface following the field, a flat bottom at `z = 0`, and side walls
//! joining the two along the grid perimeter.

use crate::errors::{LayerforgeError, Result};
use crate::float_types::{DEFAULT_BASE_LAYER_MM, DEFAULT_MODEL_SIZE_MM, Real};
use crate::heightfield::HeightField;
use crate::solid::{Solid, Triangle};
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Placement and thickness used to map grid indices to millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalSpec {
    /// Extent of the relief along X
    pub width_mm: Real,
    /// Extent of the relief along Y
    pub height_mm: Real,
    /// Solid thickness added under every sample
    pub base_layer_mm: Real,
    pub offset_x_mm: Real,
    pub offset_y_mm: Real,
}

impl Default for PhysicalSpec {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_SIZE_MM, DEFAULT_MODEL_SIZE_MM, DEFAULT_BASE_LAYER_MM)
    }
}

impl PhysicalSpec {
    pub const fn new(width_mm: Real, height_mm: Real, base_layer_mm: Real) -> Self {
        Self {
            width_mm,
            height_mm,
            base_layer_mm,
            offset_x_mm: 0.0,
            offset_y_mm: 0.0,
        }
    }

    pub const fn with_offset(mut self, offset_x_mm: Real, offset_y_mm: Real) -> Self {
        self.offset_x_mm = offset_x_mm;
        self.offset_y_mm = offset_y_mm;
        self
    }

    /// Reject non-finite values and negative sizes.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("base_layer_mm", self.base_layer_mm),
            ("offset_x_mm", self.offset_x_mm),
            ("offset_y_mm", self.offset_y_mm),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LayerforgeError::InvalidConfig(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if let Some((name, value)) = fields[..3].iter().find(|(_, v)| *v < 0.0) {
            return Err(LayerforgeError::InvalidConfig(format!(
                "{name} must not be negative, got {value}"
            )));
        }
        Ok(())
    }
}

/// Builds relief solids for a fixed [`PhysicalSpec`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReliefBuilder {
    physical: PhysicalSpec,
}

impl ReliefBuilder {
    pub const fn new(physical: PhysicalSpec) -> Self {
        Self { physical }
    }

    pub const fn physical(&self) -> &PhysicalSpec {
        &self.physical
    }

    /// Number of triangles [`ReliefBuilder::build`] emits for a `width × height` field.
    ///
    /// Each cell yields two top and two bottom triangles; each perimeter
    /// segment yields two wall triangles.
    pub const fn face_count(width: usize, height: usize) -> usize {
        let cells_x = width.saturating_sub(1);
        let cells_y = height.saturating_sub(1);
        4 * cells_x * cells_y + 4 * cells_x + 4 * cells_y
    }

    /// Triangulate `field` into a closed solid.
    ///
    /// The field's columns are mirrored first, so column 0 of the input ends
    /// up at `x = offset_x + width_mm`. This matches the orientation of the
    /// on-screen preview and of previously exported files.
    ///
    /// Output order is fixed: top surface (row-major), bottom surface
    /// (row-major), then front, back, left and right walls.
    ///
    /// A field with a single row or column has no cells and therefore no
    /// top or bottom faces. Walls are only emitted along axes with at least
    /// two samples, so such a solid encloses no volume.
    ///
    /// ## Errors
    /// - `EmptyInput` for an empty field
    /// - `InvalidConfig` if the physical spec fails [`PhysicalSpec::validate`]
    pub fn build(&self, field: &HeightField) -> Result<Solid> {
        if field.is_empty() {
            return Err(LayerforgeError::EmptyInput(
                "cannot build a relief from an empty height field".into(),
            ));
        }
        self.physical.validate()?;

        let grid = ReliefGrid::new(&field.flip_horizontal(), &self.physical);
        let (w, h) = (grid.width, grid.height);
        if w < 2 || h < 2 {
            tracing::warn!(
                width = w,
                height = h,
                "height field is thinner than 2 samples; relief will enclose no volume"
            );
        }

        let mut solid = Solid::with_capacity(Self::face_count(w, h));
        solid.extend(grid.surface(Surface::Top));
        solid.extend(grid.surface(Surface::Bottom));
        grid.walls(&mut solid);

        tracing::debug!(width = w, height = h, triangles = solid.len(), "built relief");
        Ok(solid)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Surface {
    Top,
    Bottom,
}

/// Millimeter coordinates of every grid node.
struct ReliefGrid {
    xs: Vec<Real>,
    ys: Vec<Real>,
    z_top: Vec<Real>,
    width: usize,
    height: usize,
}

impl ReliefGrid {
    fn new(field: &HeightField, physical: &PhysicalSpec) -> Self {
        let (width, height) = (field.width(), field.height());
        Self {
            xs: linspace(physical.offset_x_mm, physical.width_mm, width),
            ys: linspace(physical.offset_y_mm, physical.height_mm, height),
            z_top: field
                .samples()
                .iter()
                .map(|s| s + physical.base_layer_mm)
                .collect(),
            width,
            height,
        }
    }

    #[inline]
    fn top(&self, i: usize, j: usize) -> Point3<Real> {
        Point3::new(self.xs[j], self.ys[i], self.z_top[i * self.width + j])
    }

    #[inline]
    fn bottom(&self, i: usize, j: usize) -> Point3<Real> {
        Point3::new(self.xs[j], self.ys[i], 0.0)
    }

    /// Two triangles per cell of row `i`; top faces +Z, bottom faces -Z.
    fn surface_row(&self, i: usize, surface: Surface) -> Vec<Triangle> {
        let node = |i, j| match surface {
            Surface::Top => self.top(i, j),
            Surface::Bottom => self.bottom(i, j),
        };
        let mut tris = Vec::with_capacity(2 * self.width.saturating_sub(1));
        for j in 0..self.width.saturating_sub(1) {
            let v00 = node(i, j);
            let v10 = node(i, j + 1);
            let v01 = node(i + 1, j);
            let v11 = node(i + 1, j + 1);
            match surface {
                Surface::Top => {
                    tris.push(Triangle::new(v00, v10, v01));
                    tris.push(Triangle::new(v10, v11, v01));
                },
                Surface::Bottom => {
                    tris.push(Triangle::new(v00, v01, v10));
                    tris.push(Triangle::new(v10, v01, v11));
                },
            }
        }
        tris
    }

    #[cfg(not(feature = "parallel"))]
    fn surface(&self, surface: Surface) -> Vec<Triangle> {
        (0..self.height.saturating_sub(1))
            .flat_map(|i| self.surface_row(i, surface))
            .collect()
    }

    /// Rows are triangulated concurrently; `collect` keeps them in row order.
    #[cfg(feature = "parallel")]
    fn surface(&self, surface: Surface) -> Vec<Triangle> {
        (0..self.height.saturating_sub(1))
            .into_par_iter()
            .flat_map_iter(|i| self.surface_row(i, surface))
            .collect()
    }

    /// Outward-facing quads along the perimeter, two triangles per segment.
    fn walls(&self, solid: &mut Solid) {
        let (w, h) = (self.width, self.height);
        let last_row = h - 1;
        let last_col = w - 1;

        // front (y = min), faces -Y
        for j in 0..w.saturating_sub(1) {
            let (b0, b1) = (self.bottom(0, j), self.bottom(0, j + 1));
            let (t0, t1) = (self.top(0, j), self.top(0, j + 1));
            solid.push(Triangle::new(b0, b1, t0));
            solid.push(Triangle::new(b1, t1, t0));
        }

        // back (y = max), faces +Y
        for j in 0..w.saturating_sub(1) {
            let (b0, b1) = (self.bottom(last_row, j), self.bottom(last_row, j + 1));
            let (t0, t1) = (self.top(last_row, j), self.top(last_row, j + 1));
            solid.push(Triangle::new(b0, t0, b1));
            solid.push(Triangle::new(b1, t0, t1));
        }

        // left (x = min), faces -X
        for i in 0..h.saturating_sub(1) {
            let (b0, b1) = (self.bottom(i, 0), self.bottom(i + 1, 0));
            let (t0, t1) = (self.top(i, 0), self.top(i + 1, 0));
            solid.push(Triangle::new(b0, t0, b1));
            solid.push(Triangle::new(b1, t0, t1));
        }

        // right (x = max), faces +X
        for i in 0..h.saturating_sub(1) {
            let (b0, b1) = (self.bottom(i, last_col), self.bottom(i + 1, last_col));
            let (t0, t1) = (self.top(i, last_col), self.top(i + 1, last_col));
            solid.push(Triangle::new(b0, b1, t0));
            solid.push(Triangle::new(b1, t1, t0));
        }
    }
}

/// `n` evenly spaced values from `start` to `start + span`, both ends exact.
/// A single value sits at `start`.
fn linspace(start: Real, span: Real, n: usize) -> Vec<Real> {
    if n < 2 {
        return vec![start; n];
    }
    let last = (n - 1) as Real;
    (0..n).map(|k| start + span * (k as Real / last)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::LuminanceGrid;
    use approx::assert_relative_eq;

    fn field(rows: &[&[Real]]) -> HeightField {
        let grid = LuminanceGrid::from_rows(rows).unwrap();
        HeightField::from_luminance(&grid, 0.0, 1.0).unwrap()
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace(2.0, 100.0, 8);
        assert_eq!(xs[0], 2.0);
        assert_eq!(xs[7], 102.0);
        assert_eq!(linspace(3.0, 10.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn face_count_closed_form() {
        assert_eq!(ReliefBuilder::face_count(2, 2), 4 + 4 + 4);
        assert_eq!(ReliefBuilder::face_count(8, 8), 2 * 49 * 2 + 4 * 7 + 4 * 7);
        assert_eq!(ReliefBuilder::face_count(1, 5), 16);
        assert_eq!(ReliefBuilder::face_count(0, 0), 0);
    }

    #[test]
    fn single_cell_solid() {
        let f = field(&[&[0.0, 1.0], &[0.5, 0.25]]);
        let solid = ReliefBuilder::new(PhysicalSpec::new(10.0, 20.0, 1.0))
            .build(&f)
            .unwrap();
        assert_eq!(solid.len(), 12);

        let top = &solid.triangles[..2];
        let bottom = &solid.triangles[2..4];
        for t in top {
            assert!(t.cross().z > 0.0);
        }
        for t in bottom {
            assert!(t.cross().z < 0.0);
            assert!(t.vertices.iter().all(|v| v.z == 0.0));
        }
        assert!(solid.signed_volume() > 0.0);
    }

    #[test]
    fn columns_are_mirrored() {
        // input column 0 is the tall one
        let f = field(&[&[1.0, 0.0], &[1.0, 0.0]]);
        let solid = ReliefBuilder::new(PhysicalSpec::new(10.0, 10.0, 0.0))
            .build(&f)
            .unwrap();
        let first_top = solid.triangles[0];
        // v00 of the first top triangle sits at x = 0 and carries the mirrored column
        assert_eq!(first_top.vertices[0], Point3::new(0.0, 0.0, 0.0));
        // v10 sits at x = width and carries input column 0
        assert_eq!(first_top.vertices[1], Point3::new(10.0, 0.0, 1.0));
    }

    #[test]
    fn walls_face_outward() {
        let f = field(&[&[0.2, 0.4, 0.6], &[0.8, 1.0, 0.1], &[0.3, 0.5, 0.7]]);
        let spec = PhysicalSpec::new(30.0, 30.0, 0.5).with_offset(1.0, 2.0);
        let solid = ReliefBuilder::new(spec).build(&f).unwrap();
        let walls = &solid.triangles[16..];
        assert_eq!(walls.len(), 16);

        let expect: [(std::ops::Range<usize>, nalgebra::Vector3<Real>); 4] = [
            (0..4, -nalgebra::Vector3::y()),
            (4..8, nalgebra::Vector3::y()),
            (8..12, -nalgebra::Vector3::x()),
            (12..16, nalgebra::Vector3::x()),
        ];
        for (range, dir) in expect {
            for t in &walls[range] {
                assert_relative_eq!(t.normal().unwrap(), dir, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn offset_shifts_footprint() {
        let f = field(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let spec = PhysicalSpec::new(50.0, 40.0, 0.16).with_offset(5.0, 5.0);
        let bb = ReliefBuilder::new(spec).build(&f).unwrap().bounding_box().unwrap();
        assert_relative_eq!(bb.mins.x, 5.0);
        assert_relative_eq!(bb.maxs.x, 55.0);
        assert_relative_eq!(bb.mins.y, 5.0);
        assert_relative_eq!(bb.maxs.y, 45.0);
        assert_relative_eq!(bb.maxs.z, 1.16, epsilon = 1e-9);
    }

    #[test]
    fn thin_field_builds_without_surface() {
        let row = field(&[&[0.0, 0.5, 1.0]]);
        let solid = ReliefBuilder::default().build(&row).unwrap();
        // front and back walls only
        assert_eq!(solid.len(), ReliefBuilder::face_count(3, 1));
        assert_eq!(solid.len(), 8);

        let single = field(&[&[0.5]]);
        assert!(ReliefBuilder::default().build(&single).unwrap().is_empty());
    }

    #[test]
    fn empty_field_is_an_error() {
        assert!(matches!(
            ReliefBuilder::default().build(&HeightField::default()),
            Err(LayerforgeError::EmptyInput(_))
        ));
    }

    #[test]
    fn invalid_physical_spec_is_rejected() {
        let f = field(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let bad = PhysicalSpec::new(Real::NAN, 10.0, 0.16);
        assert!(matches!(
            ReliefBuilder::new(bad).build(&f),
            Err(LayerforgeError::InvalidConfig(_))
        ));
        let negative = PhysicalSpec::new(10.0, -1.0, 0.16);
        assert!(negative.validate().is_err());
    }
}
