//! Flat byte and base64 transport of height field samples.
//!
//! The blob is headerless: little-endian `f32` samples in row-major order.
//! Width and height travel alongside it as separate integers.

use super::{HeightField, cell_count, check_dims};
use crate::errors::{LayerforgeError, Result};
use crate::float_types::Real;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;

const SAMPLE_SIZE: usize = std::mem::size_of::<f32>();

impl HeightField {
    /// Serialize the samples as little-endian `f32`, row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * SAMPLE_SIZE);
        for &s in &self.samples {
            #[allow(clippy::unnecessary_cast)]
            out.extend_from_slice(&(s as f32).to_le_bytes());
        }
        out
    }

    /// Rebuild a field from [`HeightField::to_bytes`] output.
    ///
    /// The blob carries no depth range, so the decoded field's range is the
    /// min/max of its own samples.
    ///
    /// ## Errors
    /// - `EmptyInput` for zero dimensions
    /// - `MalformedInput` if `bytes.len() != 4 * width * height` or a sample is not finite
    pub fn from_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LayerforgeError::EmptyInput(format!(
                "height field is {width}x{height}"
            )));
        }
        let expected = cell_count(width, height)?
            .checked_mul(SAMPLE_SIZE)
            .ok_or_else(|| {
                LayerforgeError::MalformedInput(format!(
                    "{width}x{height} field is too large"
                ))
            })?;
        if bytes.len() != expected {
            return Err(LayerforgeError::MalformedInput(format!(
                "expected {expected} bytes for a {width}x{height} field, got {}",
                bytes.len()
            )));
        }

        let samples: Vec<Real> = bytes
            .chunks_exact(SAMPLE_SIZE)
            .map(|chunk| {
                let raw = [chunk[0], chunk[1], chunk[2], chunk[3]];
                Real::from(f32::from_le_bytes(raw))
            })
            .collect();
        check_dims(samples.len(), width, height)?;

        if let Some(idx) = samples.iter().position(|s| !s.is_finite()) {
            return Err(LayerforgeError::MalformedInput(format!(
                "sample {idx} is not finite"
            )));
        }

        let min = samples.iter().copied().fold(Real::INFINITY, Real::min);
        let max = samples.iter().copied().fold(Real::NEG_INFINITY, Real::max);

        Ok(Self::from_parts(samples, width, height, min, max))
    }

    /// Standard base64 of [`HeightField::to_bytes`].
    pub fn to_base64(&self) -> String {
        BASE64_ENGINE.encode(self.to_bytes())
    }

    /// Decode base64 text produced by [`HeightField::to_base64`].
    pub fn from_base64(data: &str, width: usize, height: usize) -> Result<Self> {
        let bytes = BASE64_ENGINE.decode(data.trim())?;
        Self::from_bytes(&bytes, width, height)
    }
}
