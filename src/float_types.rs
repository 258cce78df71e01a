// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used for geometric comparisons across the crate.
/// Defaults depend on precision (`f32` vs `f64`), but can be overridden:
///  1) **Build-time**: set env var `LAYERFORGE_TOLERANCE` (e.g. `LAYERFORGE_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    #[cfg(feature = "f32")]
    {
        1e-4
    }
    #[cfg(feature = "f64")]
    {
        1e-6
    }
}

/// Returns the current tolerance value.
/// If not set yet, it tries `LAYERFORGE_TOLERANCE` (parsed as the active `Real`) and
/// falls back to a sensible default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("LAYERFORGE_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `layerforge::float_types::set_tolerance(1e-6);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Below this dynamic range (in mm) a height field is treated as flat and
/// left untouched by filters.
pub const FLAT_RANGE_EPSILON: Real = 1e-6;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Defaults of the configuration surface (all in millimeters)
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
pub const DEFAULT_MIN_DEPTH_MM: Real = 0.48;
pub const DEFAULT_MAX_DEPTH_MM: Real = 2.24;
pub const DEFAULT_BASE_LAYER_MM: Real = 0.16;
pub const DEFAULT_BORDER_WIDTH_MM: Real = 2.0;
pub const DEFAULT_BORDER_DEPTH_MM: Real = 2.0;
pub const DEFAULT_MODEL_SIZE_MM: Real = 100.0;
pub const DEFAULT_DETAIL_SIZE: Real = 1.0;
