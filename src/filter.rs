//! Detail control for height fields: softening below a factor of 1.0 and
//! unsharp enhancement above it.
//!
//! Blurs run on a normalized `0..1` copy of the samples so tiny depth ranges
//! keep their precision. The borders are mirror-reflected, which keeps the
//! blur a pure weighted average (it preserves the mean and can never raise
//! the standard deviation).

use crate::float_types::{FLAT_RANGE_EPSILON, Real};
use crate::heightfield::HeightField;

/// Multiplier from `1 - detail_factor` to blur strength.
const BLUR_STRENGTH_SCALE: Real = 3.0;
/// Multiplier from `detail_factor - 1` to the unsharp amount.
const SHARPEN_AMOUNT_SCALE: Real = 0.5;
/// Radius of the reference blur used by unsharp enhancement.
const SHARPEN_REFERENCE_RADIUS: usize = 1;

/// Post-processing stage applying blur or detail boost to a [`HeightField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailFilter {
    detail_factor: Real,
}

impl Default for DetailFilter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DetailFilter {
    pub const fn new(detail_factor: Real) -> Self {
        Self { detail_factor }
    }

    pub const fn detail_factor(&self) -> Real {
        self.detail_factor
    }

    /// True when [`DetailFilter::apply`] leaves every field untouched.
    pub fn is_identity(&self) -> bool {
        // NaN compares false both ways and falls through to identity too.
        !(self.detail_factor < 1.0 || self.detail_factor > 1.0)
    }

    /// Kernel radius of the softening blur, or `None` if this filter does not blur.
    pub fn blur_radius(&self) -> Option<usize> {
        if self.detail_factor < 1.0 {
            let strength = (1.0 - self.detail_factor) * BLUR_STRENGTH_SCALE;
            Some((strength.round() as usize).max(1))
        } else {
            None
        }
    }

    /// Apply the filter and return a new field clamped to the input's depth range.
    ///
    /// - `detail_factor == 1.0`: identity.
    /// - `< 1.0`: Gaussian blur of radius `max(1, round((1 - d) * 3))`.
    /// - `> 1.0`: `f + (d - 1) * 0.5 * (f - blur_1(f))`.
    ///
    /// Fields whose samples span less than `1e-6` mm are returned unchanged.
    pub fn apply(&self, field: &HeightField) -> HeightField {
        if self.is_identity() {
            return field.clone();
        }
        let (Some(lo), Some(hi)) = (field.min_sample(), field.max_sample()) else {
            return field.clone();
        };
        if hi - lo < FLAT_RANGE_EPSILON {
            tracing::debug!(range = hi - lo, "height field is flat, skipping detail filter");
            return field.clone();
        }

        let (min_depth, max_depth) = (field.min_depth(), field.max_depth());
        let samples: Vec<Real> = if let Some(radius) = self.blur_radius() {
            tracing::debug!(radius, "softening height field");
            gaussian_blur(field, radius)
                .into_iter()
                .map(|s| s.clamp(min_depth, max_depth))
                .collect()
        } else {
            let amount = (self.detail_factor - 1.0) * SHARPEN_AMOUNT_SCALE;
            tracing::debug!(amount, "enhancing height field detail");
            let blurred = gaussian_blur(field, SHARPEN_REFERENCE_RADIUS);
            field
                .samples()
                .iter()
                .zip(&blurred)
                .map(|(&s, &b)| (s + amount * (s - b)).clamp(min_depth, max_depth))
                .collect()
        };

        HeightField::from_parts(
            samples,
            field.width(),
            field.height(),
            min_depth,
            max_depth,
        )
    }
}

/// Gaussian blur with standard deviation `radius` (in samples), returning
/// samples in the field's original units.
///
/// The blur runs on a copy normalized to `0..1` by the sample range, then is
/// mapped back. A flat field comes back unchanged. The radius is capped at the
/// longer side of the field; wider kernels only wrap around the reflection.
pub fn gaussian_blur(field: &HeightField, radius: usize) -> Vec<Real> {
    let (Some(lo), Some(hi)) = (field.min_sample(), field.max_sample()) else {
        return Vec::new();
    };
    let span = hi - lo;
    if radius == 0 || span < FLAT_RANGE_EPSILON {
        return field.samples().to_vec();
    }

    let normalized: Vec<Real> = field.samples().iter().map(|s| (s - lo) / span).collect();
    let (w, h) = (field.width(), field.height());
    let kernel = gaussian_kernel(radius.min(w.max(h)) as Real);

    let horizontal = convolve(&normalized, w, h, &kernel, Axis::Row);
    let blurred = convolve(&horizontal, w, h, &kernel, Axis::Column);

    blurred.into_iter().map(|n| n * span + lo).collect()
}

/// Normalized, symmetric Gaussian kernel truncated at three standard deviations.
fn gaussian_kernel(sigma: Real) -> Vec<Real> {
    let half = (3.0 * sigma).ceil() as isize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<Real> = (-half..=half)
        .map(|k| (-((k * k) as Real) / denom).exp())
        .collect();
    let total: Real = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= total);
    kernel
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Column,
}

/// 1D convolution along `axis` with half-sample symmetric reflection at the borders.
fn convolve(data: &[Real], width: usize, height: usize, kernel: &[Real], axis: Axis) -> Vec<Real> {
    let half = (kernel.len() / 2) as isize;
    let mut out = vec![0.0; data.len()];

    for row in 0..height {
        for col in 0..width {
            let (pos, len) = match axis {
                Axis::Row => (col, width),
                Axis::Column => (row, height),
            };
            let acc: Real = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let src = reflect_index(pos as isize + k as isize - half, len);
                    let idx = match axis {
                        Axis::Row => row * width + src,
                        Axis::Column => src * width + col,
                    };
                    weight * data[idx]
                })
                .sum();
            out[row * width + col] = acc;
        }
    }
    out
}

/// Map any integer position onto `0..len` by mirroring (`.. b a | a b c | c b ..`).
#[inline]
fn reflect_index(pos: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let folded = pos.rem_euclid(period) as usize;
    if folded < len { folded } else { 2 * len - 1 - folded }
}
