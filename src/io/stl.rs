//! Binary and ASCII STL encoders.
//!
//! Facet normals are always written as zero; consumers recompute them from
//! the vertex winding.

use crate::errors::{LayerforgeError, Result};
use crate::solid::Solid;
use crate::triangulated::Triangulated3D;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Free-form binary header preceding the triangle count.
pub const HEADER_SIZE: usize = 80;
/// Normal, three vertices and the attribute byte count.
pub const TRIANGLE_SIZE: usize = 50;

/// Output flavour of [`write_stl`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlMode {
    #[default]
    Binary,
    Ascii,
}

/// Exact size of the binary encoding of `triangles` faces.
pub const fn binary_size(triangles: usize) -> usize {
    HEADER_SIZE + 4 + TRIANGLE_SIZE * triangles
}

fn ensure_not_empty<T: Triangulated3D + ?Sized>(shape: &T) -> Result<usize> {
    match shape.triangle_count() {
        0 => Err(LayerforgeError::EmptyMesh),
        n => Ok(n),
    }
}

/// Encode `shape` as binary STL into `writer`.
pub fn write_stl_binary<T, W>(shape: &T, writer: &mut W) -> std::io::Result<()>
where
    T: Triangulated3D + ?Sized,
    W: Write,
{
    let mut triangles = Vec::<stl_io::Triangle>::new();
    shape.visit_triangles(|tri| {
        #[allow(clippy::unnecessary_cast)]
        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new([0.0; 3]),
            vertices: tri
                .vertices
                .map(|p| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
        });
    });
    stl_io::write_stl(writer, triangles.iter())
}

/// Encode `shape` as ASCII STL named `name` into `writer`.
pub fn write_stl_ascii<T, W>(shape: &T, name: &str, writer: &mut W) -> std::io::Result<()>
where
    T: Triangulated3D + ?Sized,
    W: Write,
{
    writer.write_all(to_ascii_text(shape, name).as_bytes())
}

fn to_ascii_text<T: Triangulated3D + ?Sized>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "solid {name}");
    shape.visit_triangles(|tri| {
        out.push_str("  facet normal 0 0 0\n");
        out.push_str("    outer loop\n");
        for p in &tri.vertices {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Convert `shape` to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use layerforge::solid::Solid;
/// # use layerforge::io::stl::to_stl_ascii;
/// let text = to_stl_ascii(&Solid::box_at(0.0, 0.0, 1.0, 1.0, 0.0, 1.0), "cube").unwrap();
/// assert!(text.starts_with("solid cube\n"));
/// assert_eq!(text.matches("facet normal 0 0 0").count(), 12);
/// ```
///
/// ## Errors
/// `EmptyMesh` when `shape` has no triangles.
pub fn to_stl_ascii<T: Triangulated3D + ?Sized>(shape: &T, name: &str) -> Result<String> {
    ensure_not_empty(shape)?;
    Ok(to_ascii_text(shape, name))
}

/// Convert `shape` to a **binary STL** byte vector of exactly
/// [`binary_size`]`(n)` bytes.
///
/// ## Errors
/// `EmptyMesh` when `shape` has no triangles.
pub fn to_stl_binary<T: Triangulated3D + ?Sized>(shape: &T) -> Result<Vec<u8>> {
    let count = ensure_not_empty(shape)?;
    let mut cursor = Cursor::new(Vec::with_capacity(binary_size(count)));
    write_stl_binary(shape, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Write `solid` to `path` in the requested mode.
///
/// The file is created only for non-empty solids, and is flushed before
/// returning so late write failures surface as `IoWrite`. A file that could
/// not be written completely is removed again.
///
/// ## Errors
/// `EmptyMesh` for a solid without triangles, `IoWrite` when the file cannot
/// be created or written.
pub fn write_stl(solid: &Solid, path: impl AsRef<Path>, mode: StlMode) -> Result<()> {
    let path = path.as_ref();
    let count = ensure_not_empty(solid)?;

    let file = File::create(path).map_err(|e| LayerforgeError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    let written = match mode {
        StlMode::Binary => write_stl_binary(solid, &mut writer),
        StlMode::Ascii => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("layerforge");
            write_stl_ascii(solid, name, &mut writer)
        },
    }
    .and_then(|()| writer.flush());
    drop(writer);
    discard_on_error(path, written)?;

    tracing::info!(path = %path.display(), ?mode, triangles = count, "wrote STL");
    Ok(())
}

/// Map a failed write to `IoWrite`, removing the partial file at `path` first.
fn discard_on_error(path: &Path, written: std::io::Result<()>) -> Result<()> {
    written.map_err(|e| {
        if let Err(remove) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove, "could not remove partial STL");
        }
        LayerforgeError::io_write(path, e)
    })
}

impl Solid {
    pub fn to_stl_ascii(&self, name: &str) -> Result<String> {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> Result<Vec<u8>> {
        self::to_stl_binary(self)
    }

    pub fn write_stl(&self, path: impl AsRef<Path>, mode: StlMode) -> Result<()> {
        self::write_stl(self, path, mode)
    }
}
