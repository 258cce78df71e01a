//! End-to-end conversion: height field and configuration in, solid (or STL
//! artifact) out.

use crate::border::BorderBuilder;
use crate::config::MeshConfig;
use crate::errors::Result;
use crate::heightfield::HeightField;
use crate::relief::ReliefBuilder;
use crate::solid::Solid;

#[cfg(feature = "stl-io")]
use crate::{
    config::MeshRequest,
    io::{MeshStats, stl::StlMode},
};
#[cfg(feature = "stl-io")]
use std::path::Path;

/// Resample, filter, triangulate and frame `field` according to `config`.
///
/// With `has_border` the relief is placed at `(b, b)` and the result is
/// `[relief, border]` combined in that order.
///
/// ## Errors
/// Any [`MeshConfig::validate`] failure, or `EmptyInput` for an empty field.
pub fn generate_mesh(field: &HeightField, config: &MeshConfig) -> Result<Solid> {
    config.validate()?;

    let resampled;
    let mut field = field;
    if let Some(target) = config.mesh_resolution.filter(|&t| t > 0) {
        resampled = field.resample_to(target);
        field = &resampled;
    }

    let detail = config.detail_filter();
    let filtered;
    if !detail.is_identity() {
        filtered = detail.apply(field);
        field = &filtered;
    }

    let physical = config.physical_spec();
    let relief = ReliefBuilder::new(physical).build(field)?;
    if !config.has_border {
        return Ok(relief);
    }

    let border = BorderBuilder::new(config.border_spec()).build(&physical)?;
    Ok(Solid::combine(&[&relief, &border]))
}

/// Decode the request's height field, generate its solid and write it to `path`.
///
/// ## Errors
/// Decoding errors (`Base64`, `EmptyInput`, `MalformedInput`), any
/// [`generate_mesh`] error, and [`crate::io::stl::write_stl`] errors.
#[cfg(feature = "stl-io")]
pub fn export_mesh(request: &MeshRequest, path: impl AsRef<Path>, mode: StlMode) -> Result<MeshStats> {
    let field = request.height_field()?;
    tracing::debug!(width = field.width(), height = field.height(), "decoded height field");

    let solid = generate_mesh(&field, &request.config)?;
    solid.write_stl(path, mode)?;
    solid.stats()
}
