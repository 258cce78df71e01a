//! Rectangular frame around a relief, built as four independent boxes.

use crate::errors::{LayerforgeError, Result};
use crate::float_types::{DEFAULT_BORDER_DEPTH_MM, DEFAULT_BORDER_WIDTH_MM, Real};
use crate::relief::PhysicalSpec;
use crate::solid::Solid;

/// Frame geometry, independent of the height field resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderSpec {
    /// Thickness of each frame bar in X/Y
    pub border_width_mm: Real,
    /// Height of the frame above the base layer
    pub border_depth_mm: Real,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self::new(DEFAULT_BORDER_WIDTH_MM, DEFAULT_BORDER_DEPTH_MM)
    }
}

impl BorderSpec {
    pub const fn new(border_width_mm: Real, border_depth_mm: Real) -> Self {
        Self {
            border_width_mm,
            border_depth_mm,
        }
    }

    /// The width must be positive and the depth non-negative, both finite.
    pub fn validate(&self) -> Result<()> {
        if !self.border_width_mm.is_finite() || self.border_width_mm <= 0.0 {
            return Err(LayerforgeError::InvalidConfig(format!(
                "border_width_mm must be positive, got {}",
                self.border_width_mm
            )));
        }
        if !self.border_depth_mm.is_finite() || self.border_depth_mm < 0.0 {
            return Err(LayerforgeError::InvalidConfig(format!(
                "border_depth_mm must not be negative, got {}",
                self.border_depth_mm
            )));
        }
        Ok(())
    }
}

/// Builds the frame solid for a fixed [`BorderSpec`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BorderBuilder {
    border: BorderSpec,
}

impl BorderBuilder {
    pub const fn new(border: BorderSpec) -> Self {
        Self { border }
    }

    pub const fn border(&self) -> &BorderSpec {
        &self.border
    }

    /// Four closed boxes (front, back, left, right) around a
    /// `width_mm × height_mm` model, in that order.
    ///
    /// The outer footprint is `(width_mm + 2b) × (height_mm + 2b)` with its
    /// corner at the origin, so the relief belongs at offset `(b, b)`. Front
    /// and back bars span the full outer width; left and right bars fill the
    /// gap between them. Every box spans `z ∈ [0, base_layer_mm + border_depth_mm]`.
    ///
    /// ## Errors
    /// `InvalidConfig` if either spec fails validation.
    pub fn build(&self, physical: &PhysicalSpec) -> Result<Solid> {
        physical.validate()?;
        self.border.validate()?;

        let b = self.border.border_width_mm;
        let (w, h) = (physical.width_mm, physical.height_mm);
        let outer_w = w + 2.0 * b;
        let z_top = physical.base_layer_mm + self.border.border_depth_mm;

        // (x, y, width, depth)
        let segments = [
            (0.0, 0.0, outer_w, b),
            (0.0, h + b, outer_w, b),
            (0.0, b, b, h),
            (w + b, b, b, h),
        ];

        let frame: Solid = segments
            .iter()
            .map(|&(x, y, sw, sd)| Solid::box_at(x, y, sw, sd, 0.0, z_top))
            .collect();

        tracing::debug!(
            outer_w,
            outer_h = h + 2.0 * b,
            z_top,
            triangles = frame.len(),
            "built border"
        );
        Ok(frame)
    }
}
