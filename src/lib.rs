//! Turns a **height field** (a grid of depths in millimeters, usually derived
//! from image luminance) into a watertight triangle solid ready for
//! fused-filament printing, and writes it as **STL**.
//!
//! The pipeline is a chain of pure value transforms:
//! [`LuminanceGrid`] → [`HeightField`] → optional [`DetailFilter`] →
//! [`ReliefBuilder`] (+ optional [`BorderBuilder`]) → [`Solid::combine`] →
//! [`io::stl::write_stl`].
//!
//! ```
//! # use layerforge::{HeightField, LuminanceGrid, PhysicalSpec, ReliefBuilder};
//! let grid = LuminanceGrid::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
//! let field = HeightField::from_luminance(&grid, 0.48, 2.24).unwrap();
//! let solid = ReliefBuilder::new(PhysicalSpec::new(20.0, 20.0, 0.16)).build(&field).unwrap();
//! assert_eq!(solid.len(), ReliefBuilder::face_count(2, 2));
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): binary and ASCII `.stl` export
//! - **image-io**: build luminance grids from `image` gray buffers
//! - **hashmap**: enables use of hashbrown for `is_manifold` edge analysis
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to triangulate surface rows

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod border;
pub mod config;
pub mod errors;
pub mod filter;
pub mod float_types;
pub mod heightfield;
pub mod io;
pub mod pipeline;
pub mod relief;
pub mod shapes;
pub mod solid;
pub mod triangulated;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use border::{BorderBuilder, BorderSpec};
pub use config::{MeshConfig, MeshRequest};
pub use errors::{LayerforgeError, Result};
pub use filter::DetailFilter;
pub use heightfield::{HeightField, HeightStats, LuminanceGrid};
pub use io::MeshStats;
pub use pipeline::generate_mesh;
pub use relief::{PhysicalSpec, ReliefBuilder};
pub use solid::{Solid, Triangle};

#[cfg(feature = "stl-io")]
pub use io::stl::{StlMode, write_stl};
#[cfg(feature = "stl-io")]
pub use pipeline::export_mesh;
