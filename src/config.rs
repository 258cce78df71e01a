//! The configuration surface, populated once at the system boundary.
//!
//! Every field has a default, so `{}` is a complete configuration. Keys are
//! `snake_case` only.

use crate::border::BorderSpec;
use crate::errors::{LayerforgeError, Result};
use crate::filter::DetailFilter;
use crate::float_types::{
    DEFAULT_BASE_LAYER_MM, DEFAULT_BORDER_DEPTH_MM, DEFAULT_BORDER_WIDTH_MM, DEFAULT_DETAIL_SIZE,
    DEFAULT_MAX_DEPTH_MM, DEFAULT_MIN_DEPTH_MM, DEFAULT_MODEL_SIZE_MM, Real,
};
use crate::heightfield::{HeightField, LuminanceGrid};
use crate::relief::PhysicalSpec;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Depth for luminance 0
    pub min_depth_mm: Real,
    /// Depth for luminance 1
    pub max_depth_mm: Real,
    pub width_mm: Real,
    pub height_mm: Real,
    pub base_layer_mm: Real,
    pub has_border: bool,
    pub border_width_mm: Real,
    pub border_depth_mm: Real,
    /// Largest grid side after downsampling; `None` or `0` keeps the input resolution
    pub mesh_resolution: Option<usize>,
    /// Detail factor, see [`DetailFilter`]
    pub detail_size: Real,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            min_depth_mm: DEFAULT_MIN_DEPTH_MM,
            max_depth_mm: DEFAULT_MAX_DEPTH_MM,
            width_mm: DEFAULT_MODEL_SIZE_MM,
            height_mm: DEFAULT_MODEL_SIZE_MM,
            base_layer_mm: DEFAULT_BASE_LAYER_MM,
            has_border: false,
            border_width_mm: DEFAULT_BORDER_WIDTH_MM,
            border_depth_mm: DEFAULT_BORDER_DEPTH_MM,
            mesh_resolution: None,
            detail_size: DEFAULT_DETAIL_SIZE,
        }
    }
}

impl MeshConfig {
    /// ## Errors
    /// - `InvalidRange` if `max_depth_mm < min_depth_mm`
    /// - `InvalidConfig` for non-finite values, negative dimensions, a
    ///   negative detail factor, or an invalid border when `has_border` is set
    pub fn validate(&self) -> Result<()> {
        if !self.min_depth_mm.is_finite() || !self.max_depth_mm.is_finite() {
            return Err(LayerforgeError::InvalidConfig(format!(
                "depth range must be finite, got [{}, {}]",
                self.min_depth_mm, self.max_depth_mm
            )));
        }
        if self.max_depth_mm < self.min_depth_mm {
            return Err(LayerforgeError::InvalidRange {
                min: self.min_depth_mm,
                max: self.max_depth_mm,
            });
        }
        if !self.detail_size.is_finite() || self.detail_size < 0.0 {
            return Err(LayerforgeError::InvalidConfig(format!(
                "detail_size must not be negative, got {}",
                self.detail_size
            )));
        }
        self.physical_spec().validate()?;
        if self.has_border {
            self.border_spec().validate()?;
        }
        Ok(())
    }

    /// Relief placement: at `(b, b)` when a border surrounds it, else at the origin.
    pub fn physical_spec(&self) -> PhysicalSpec {
        let offset = self.border_offset();
        PhysicalSpec::new(self.width_mm, self.height_mm, self.base_layer_mm)
            .with_offset(offset, offset)
    }

    pub fn border_spec(&self) -> BorderSpec {
        BorderSpec::new(self.border_width_mm, self.border_depth_mm)
    }

    /// The border bar width when `has_border`, otherwise zero.
    pub fn border_offset(&self) -> Real {
        if self.has_border {
            self.border_width_mm
        } else {
            0.0
        }
    }

    pub fn detail_filter(&self) -> DetailFilter {
        DetailFilter::new(self.detail_size)
    }

    /// Map a luminance grid onto this configuration's depth range.
    pub fn height_field(&self, grid: &LuminanceGrid) -> Result<HeightField> {
        HeightField::from_luminance(grid, self.min_depth_mm, self.max_depth_mm)
    }
}

/// JSON envelope of a mesh generation request.
///
/// ```json
/// { "heightmap_base64": "...", "width": 64, "height": 48, "config": { "has_border": true } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshRequest {
    /// Base64 of little-endian `f32` depth samples, row-major
    pub heightmap_base64: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub config: MeshConfig,
}

impl MeshRequest {
    pub fn new(field: &HeightField, config: MeshConfig) -> Self {
        Self {
            heightmap_base64: field.to_base64(),
            width: field.width(),
            height: field.height(),
            config,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode the embedded height field.
    pub fn height_field(&self) -> Result<HeightField> {
        HeightField::from_base64(&self.heightmap_base64, self.width, self.height)
    }
}
