//! `HeightField`: a dense grid of depth samples (millimeters) produced from a
//! normalized luminance grid, plus the depth range that produced it.
//!
//! Samples are stored row-major: sample `(row, col)` lives at `row * width + col`.
//! A field is immutable once built; filters and resampling return new fields.

use crate::errors::{LayerforgeError, Result};
use crate::float_types::Real;

mod transport;

#[cfg(feature = "image-io")]
pub mod image;

/// Normalized luminance grid handed over by the image-processing collaborator.
///
/// Values are expected in `[0, 1]`; anything outside is clamped when the grid
/// is mapped to depths.
#[derive(Clone, Debug, PartialEq)]
pub struct LuminanceGrid {
    values: Vec<Real>,
    width: usize,
    height: usize,
}

impl LuminanceGrid {
    /// Wrap a row-major buffer of `width * height` luminance values.
    pub fn new(values: Vec<Real>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LayerforgeError::EmptyInput(format!(
                "luminance grid is {width}x{height}"
            )));
        }
        if values.len() != cell_count(width, height)? {
            return Err(LayerforgeError::EmptyInput(format!(
                "luminance grid declares {width}x{height} but holds {} values",
                values.len()
            )));
        }
        Ok(Self {
            values,
            width,
            height,
        })
    }

    /// Build a grid from nested rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[Real]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(cell_count(width, height)?);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LayerforgeError::MalformedInput(format!(
                    "row {i} has {} values, expected {width}",
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }
        Self::new(values, width, height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }
}

/// Summary statistics over all samples of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightStats {
    pub min: Real,
    pub max: Real,
    pub mean: Real,
    /// Population standard deviation.
    pub std: Real,
}

/// A width × height grid of depth samples in millimeters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightField {
    samples: Vec<Real>,
    width: usize,
    height: usize,
    min_depth: Real,
    max_depth: Real,
}

impl HeightField {
    /// Map a luminance grid linearly onto `[min_depth_mm, max_depth_mm]`.
    ///
    /// Luminance 0 becomes `min_depth_mm` and luminance 1 becomes
    /// `max_depth_mm`, exactly.
    ///
    /// ## Errors
    /// `InvalidRange` if `max_depth_mm < min_depth_mm` (or either is NaN).
    ///
    /// ## Example
    /// ```
    /// # use layerforge::heightfield::{HeightField, LuminanceGrid};
    /// let grid = LuminanceGrid::from_rows(&[[0.0, 0.5], [0.5, 1.0]]).unwrap();
    /// let field = HeightField::from_luminance(&grid, 1.0, 3.0).unwrap();
    /// assert_eq!(field.samples(), &[1.0, 2.0, 2.0, 3.0]);
    /// ```
    pub fn from_luminance(
        grid: &LuminanceGrid,
        min_depth_mm: Real,
        max_depth_mm: Real,
    ) -> Result<Self> {
        check_range(min_depth_mm, max_depth_mm)?;
        if grid.width == 0 || grid.height == 0 {
            return Err(LayerforgeError::EmptyInput(format!(
                "luminance grid is {}x{}",
                grid.width, grid.height
            )));
        }

        let range = max_depth_mm - min_depth_mm;
        let samples = grid
            .values
            .iter()
            .map(|&lum| {
                let lum = if lum.is_nan() { 0.0 } else { lum.clamp(0.0, 1.0) };
                // Rounding can push `min + 1 * range` a hair past `max`.
                (min_depth_mm + lum * range).clamp(min_depth_mm, max_depth_mm)
            })
            .collect();

        Ok(Self {
            samples,
            width: grid.width,
            height: grid.height,
            min_depth: min_depth_mm,
            max_depth: max_depth_mm,
        })
    }

    /// Build a field from depth samples that are already in millimeters.
    ///
    /// ## Errors
    /// - `EmptyInput` for zero dimensions or a buffer of the wrong length
    /// - `InvalidRange` if `max_depth < min_depth`
    /// - `MalformedInput` if any sample falls outside `[min_depth, max_depth]`
    pub fn from_samples(
        samples: Vec<Real>,
        width: usize,
        height: usize,
        min_depth: Real,
        max_depth: Real,
    ) -> Result<Self> {
        check_range(min_depth, max_depth)?;
        check_dims(samples.len(), width, height)?;
        if let Some((idx, s)) = samples
            .iter()
            .enumerate()
            .find(|&(_, &s)| !(min_depth..=max_depth).contains(&s))
        {
            return Err(LayerforgeError::MalformedInput(format!(
                "sample {idx} = {s} lies outside [{min_depth}, {max_depth}]"
            )));
        }
        Ok(Self::from_parts(samples, width, height, min_depth, max_depth))
    }

    /// Construct without validation. Callers guarantee the invariants.
    pub(crate) const fn from_parts(
        samples: Vec<Real>,
        width: usize,
        height: usize,
        min_depth: Real,
        max_depth: Real,
    ) -> Self {
        Self {
            samples,
            width,
            height,
            min_depth,
            max_depth,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Lower bound of the depth range the field was produced with.
    pub const fn min_depth(&self) -> Real {
        self.min_depth
    }

    /// Upper bound of the depth range the field was produced with.
    pub const fn max_depth(&self) -> Real {
        self.max_depth
    }

    pub fn samples(&self) -> &[Real] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `(row, col)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Real> {
        if row < self.height && col < self.width {
            Some(self.samples[row * self.width + col])
        } else {
            None
        }
    }

    /// Iterate over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Real]> {
        // `chunks_exact(0)` panics, and an empty field has no rows anyway.
        self.samples.chunks_exact(self.width.max(1))
    }

    /// Largest sample, or `None` for an empty field.
    pub fn max_sample(&self) -> Option<Real> {
        self.samples.iter().copied().reduce(Real::max)
    }

    /// Smallest sample, or `None` for an empty field.
    pub fn min_sample(&self) -> Option<Real> {
        self.samples.iter().copied().reduce(Real::min)
    }

    /// Bilinear sample at normalized coordinates `u` (columns) and `v` (rows).
    ///
    /// `(0, 0)` is the first sample and `(1, 1)` the last one. Coordinates
    /// outside `[0, 1]` stick to the nearest edge. An empty field yields `0.0`.
    pub fn sample_bilinear(&self, u: Real, v: Real) -> Real {
        if self.is_empty() {
            return 0.0;
        }
        let clamp_unit = |t: Real| if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let px = clamp_unit(u) * (self.width - 1) as Real;
        let py = clamp_unit(v) * (self.height - 1) as Real;

        let x0 = (px.floor() as usize).min(self.width - 1);
        let y0 = (py.floor() as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = px - x0 as Real;
        let fy = py - y0 as Real;

        let at = |row: usize, col: usize| self.samples[row * self.width + col];
        let top = at(y0, x0) * (1.0 - fx) + at(y0, x1) * fx;
        let bottom = at(y1, x0) * (1.0 - fx) + at(y1, x1) * fx;

        top * (1.0 - fy) + bottom * fy
    }

    /// Min, max, mean and population standard deviation over all samples.
    ///
    /// Returns `None` for an empty field rather than failing.
    pub fn stats(&self) -> Option<HeightStats> {
        let min = self.min_sample()?;
        let max = self.max_sample()?;
        let n = self.samples.len() as Real;
        let mean = self.samples.iter().sum::<Real>() / n;
        let variance = self
            .samples
            .iter()
            .map(|s| (s - mean) * (s - mean))
            .sum::<Real>()
            / n;

        Some(HeightStats {
            min,
            max,
            mean,
            std: variance.sqrt(),
        })
    }

    /// Mirror the column order of every row.
    pub fn flip_horizontal(&self) -> Self {
        let samples = self
            .rows()
            .flat_map(|row| row.iter().rev().copied())
            .collect();
        Self::from_parts(
            samples,
            self.width,
            self.height,
            self.min_depth,
            self.max_depth,
        )
    }

    /// Downsample so the longer side has at most `max_dimension` samples.
    ///
    /// The new size is `max(1, floor(side * scale))` with
    /// `scale = max_dimension / longer_side`. Samples are taken bilinearly on a
    /// grid that maps corners to corners. Fields already within the target
    /// (and a target of 0) are returned unchanged.
    pub fn resample_to(&self, max_dimension: usize) -> Self {
        let longest = self.width.max(self.height);
        if max_dimension == 0 || max_dimension >= longest {
            return self.clone();
        }

        let scale = max_dimension as Real / longest as Real;
        let new_w = ((self.width as Real * scale).floor() as usize).max(1);
        let new_h = ((self.height as Real * scale).floor() as usize).max(1);

        let unit = |i: usize, n: usize| {
            if n > 1 {
                i as Real / (n - 1) as Real
            } else {
                0.0
            }
        };

        let mut samples = Vec::with_capacity(new_w * new_h);
        for r in 0..new_h {
            let v = unit(r, new_h);
            for c in 0..new_w {
                let s = self.sample_bilinear(unit(c, new_w), v);
                samples.push(s.clamp(self.min_depth, self.max_depth));
            }
        }

        tracing::debug!(
            from_w = self.width,
            from_h = self.height,
            to_w = new_w,
            to_h = new_h,
            "resampled height field"
        );

        Self::from_parts(samples, new_w, new_h, self.min_depth, self.max_depth)
    }
}

fn check_range(min: Real, max: Real) -> Result<()> {
    // NaN fails both comparisons, so it is rejected here too.
    if max >= min {
        Ok(())
    } else {
        Err(LayerforgeError::InvalidRange { min, max })
    }
}

/// `width * height`, or `MalformedInput` when the product does not fit in `usize`.
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| {
        LayerforgeError::MalformedInput(format!("{width}x{height} grid is too large"))
    })
}

fn check_dims(len: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(LayerforgeError::EmptyInput(format!(
            "height field is {width}x{height}"
        )));
    }
    if len != cell_count(width, height)? {
        return Err(LayerforgeError::EmptyInput(format!(
            "height field declares {width}x{height} but holds {len} samples"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(width: usize, height: usize, min: Real, max: Real) -> HeightField {
        let n = width * height;
        let values = (0..n).map(|i| i as Real / (n - 1) as Real).collect();
        let grid = LuminanceGrid::new(values, width, height).unwrap();
        HeightField::from_luminance(&grid, min, max).unwrap()
    }

    #[test]
    fn luminance_maps_linearly() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 0.5], [0.5, 1.0]]).unwrap();
        let field = HeightField::from_luminance(&grid, 1.0, 3.0).unwrap();
        assert_eq!(field.samples(), &[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(field.min_depth(), 1.0);
        assert_eq!(field.max_depth(), 3.0);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            LuminanceGrid::new(vec![], usize::MAX / 2, 3),
            Err(LayerforgeError::MalformedInput(_))
        ));
        assert!(matches!(
            HeightField::from_samples(vec![], usize::MAX / 2, 3, 0.0, 1.0),
            Err(LayerforgeError::MalformedInput(_))
        ));
    }

    #[test]
    fn luminance_endpoints_are_exact() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 1.0]]).unwrap();
        let field = HeightField::from_luminance(&grid, 0.48, 2.24).unwrap();
        assert_eq!(field.get(0, 0), Some(0.48));
        assert_eq!(field.get(0, 1), Some(2.24));
    }

    #[test]
    fn out_of_range_luminance_is_clamped() {
        let grid = LuminanceGrid::from_rows(&[[-0.5, 1.5, Real::NAN]]).unwrap();
        let field = HeightField::from_luminance(&grid, 0.5, 2.0).unwrap();
        assert_eq!(field.samples(), &[0.5, 2.0, 0.5]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 1.0]]).unwrap();
        let err = HeightField::from_luminance(&grid, 2.0, 1.0).unwrap_err();
        assert!(matches!(err, LayerforgeError::InvalidRange { .. }));
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(matches!(
            LuminanceGrid::new(vec![], 0, 3),
            Err(LayerforgeError::EmptyInput(_))
        ));
        assert!(matches!(
            LuminanceGrid::new(vec![0.0; 5], 2, 3),
            Err(LayerforgeError::EmptyInput(_))
        ));
        let rows: [[Real; 0]; 0] = [];
        assert!(LuminanceGrid::from_rows(&rows).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![0.0, 1.0], vec![0.5]];
        assert!(matches!(
            LuminanceGrid::from_rows(&rows),
            Err(LayerforgeError::MalformedInput(_))
        ));
    }

    #[test]
    fn from_samples_checks_bounds() {
        assert!(HeightField::from_samples(vec![1.0, 2.0], 2, 1, 1.0, 2.0).is_ok());
        assert!(matches!(
            HeightField::from_samples(vec![1.0, 2.5], 2, 1, 1.0, 2.0),
            Err(LayerforgeError::MalformedInput(_))
        ));
    }

    #[test]
    fn bilinear_hits_corners() {
        let field = ramp(4, 3, 0.5, 2.0);
        assert_eq!(field.sample_bilinear(0.0, 0.0), field.get(0, 0).unwrap());
        assert_relative_eq!(
            field.sample_bilinear(1.0, 1.0),
            field.get(2, 3).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            field.sample_bilinear(1.0, 0.0),
            field.get(0, 3).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn bilinear_blends_center() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let field = HeightField::from_luminance(&grid, 0.0, 2.0).unwrap();
        assert_relative_eq!(field.sample_bilinear(0.5, 0.5), 1.0, epsilon = 1e-12);
        assert_relative_eq!(field.sample_bilinear(0.5, 0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bilinear_clamps_outside_coordinates() {
        let field = ramp(3, 3, 0.0, 1.0);
        assert_eq!(field.sample_bilinear(-3.0, -1.0), field.get(0, 0).unwrap());
        assert_relative_eq!(
            field.sample_bilinear(7.0, 2.0),
            field.get(2, 2).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn bilinear_on_empty_field_is_zero() {
        assert_eq!(HeightField::default().sample_bilinear(0.3, 0.7), 0.0);
    }

    #[test]
    fn single_sample_field_samples_everywhere() {
        let grid = LuminanceGrid::from_rows(&[[0.25]]).unwrap();
        let field = HeightField::from_luminance(&grid, 0.0, 4.0).unwrap();
        assert_eq!(field.sample_bilinear(0.9, 0.1), 1.0);
    }

    #[test]
    fn stats_over_samples() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 1.0], [0.0, 1.0]]).unwrap();
        let field = HeightField::from_luminance(&grid, 1.0, 3.0).unwrap();
        let stats = field.stats().unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_relative_eq!(stats.mean, 2.0);
        assert_relative_eq!(stats.std, 1.0);
    }

    #[test]
    fn stats_on_empty_field_is_none() {
        assert!(HeightField::default().stats().is_none());
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let grid = LuminanceGrid::from_rows(&[[0.0, 0.5, 1.0], [1.0, 0.5, 0.0]]).unwrap();
        let field = HeightField::from_luminance(&grid, 0.0, 2.0).unwrap();
        let flipped = field.flip_horizontal();
        assert_eq!(flipped.samples(), &[2.0, 1.0, 0.0, 0.0, 1.0, 2.0]);
        assert_eq!(flipped.flip_horizontal(), field);
    }

    #[test]
    fn resample_shrinks_longest_side() {
        let field = ramp(40, 20, 0.5, 2.0);
        let small = field.resample_to(10);
        assert_eq!(small.width(), 10);
        assert_eq!(small.height(), 5);
        assert_eq!(small.get(0, 0), field.get(0, 0));
        assert_relative_eq!(
            small.get(4, 9).unwrap(),
            field.get(19, 39).unwrap(),
            epsilon = 1e-12
        );
        assert_eq!(small.min_depth(), field.min_depth());
    }

    #[test]
    fn resample_keeps_small_fields() {
        let field = ramp(8, 6, 0.5, 2.0);
        assert_eq!(field.resample_to(8), field);
        assert_eq!(field.resample_to(0), field);
    }

    #[test]
    fn resample_never_collapses_to_zero() {
        let field = ramp(100, 2, 0.0, 1.0);
        let small = field.resample_to(10);
        assert_eq!((small.width(), small.height()), (10, 1));
    }
}
