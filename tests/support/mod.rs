//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use layerforge::{HeightField, LuminanceGrid, float_types::Real, solid::Solid};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of every vertex of `solid`.
pub fn bounding_box(solid: &Solid) -> [Real; 6] {
    let bb = solid.bounding_box().expect("solid has no triangles");
    [bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// A `w × h` field whose samples sweep `[min, max]` in row-major order, so
/// the first sample is `min` and the last is `max`.
pub fn sweep_field(w: usize, h: usize, min: Real, max: Real) -> HeightField {
    let n = w * h;
    let samples = (0..n)
        .map(|i| {
            let t = if n > 1 { i as Real / (n - 1) as Real } else { 0.0 };
            (min + t * (max - min)).clamp(min, max)
        })
        .collect();
    HeightField::from_samples(samples, w, h, min, max).expect("valid sweep field")
}

/// Deterministic pseudo-random luminance in `[0, 1]`.
pub fn noise_grid(w: usize, h: usize, seed: u64) -> LuminanceGrid {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let values = (0..w * h)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 40) as Real / (1u64 << 24) as Real
        })
        .collect();
    LuminanceGrid::new(values, w, h).expect("valid noise grid")
}
