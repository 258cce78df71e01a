#![cfg(feature = "stl-io")]

mod support;

use layerforge::io::stl::{HEADER_SIZE, TRIANGLE_SIZE, binary_size};
use layerforge::{
    HeightField, LayerforgeError, MeshConfig, MeshRequest, PhysicalSpec, ReliefBuilder, Solid,
    StlMode, export_mesh, generate_mesh, write_stl,
};
use support::{approx_eq, sweep_field};

fn relief() -> Solid {
    ReliefBuilder::new(PhysicalSpec::new(100.0, 80.0, 0.16))
        .build(&sweep_field(8, 8, 0.5, 2.0))
        .unwrap()
}

#[test]
fn binary_header_and_count() {
    let solid = relief();
    let bytes = solid.to_stl_binary().unwrap();
    assert_eq!(bytes.len(), 84 + 50 * solid.len());
    assert_eq!(bytes.len(), binary_size(solid.len()));

    let count = u32::from_le_bytes(bytes[HEADER_SIZE..HEADER_SIZE + 4].try_into().unwrap());
    assert_eq!(count as usize, solid.len());
    assert!(
        bytes[HEADER_SIZE + 4..]
            .chunks(TRIANGLE_SIZE)
            .all(|r| r[..12].iter().all(|&b| b == 0) && r[48..] == [0, 0])
    );
}

#[test]
fn binary_is_readable_by_stl_io() {
    let solid = relief();
    let bytes = solid.to_stl_binary().unwrap();
    let mut cursor = std::io::Cursor::new(bytes);
    let mesh = stl_io::read_stl(&mut cursor).unwrap();
    assert_eq!(mesh.faces.len(), solid.len());
}

#[test]
fn ascii_blocks_per_triangle() {
    let solid = relief();
    let text = solid.to_stl_ascii("relief").unwrap();
    assert_eq!(text.matches("solid relief").count(), 2); // "solid" and "endsolid"
    assert!(text.starts_with("solid relief\n"));
    assert!(text.trim_end().ends_with("endsolid relief"));
    assert_eq!(text.matches("facet normal 0 0 0").count(), solid.len());
    assert_eq!(
        text.lines().filter(|l| l.trim_start().starts_with("vertex ")).count(),
        3 * solid.len()
    );
}

#[test]
fn write_both_modes() {
    let dir = tempfile::tempdir().unwrap();
    let solid = relief();

    let bin = dir.path().join("relief.stl");
    write_stl(&solid, &bin, StlMode::Binary).unwrap();
    assert_eq!(std::fs::read(&bin).unwrap(), solid.to_stl_binary().unwrap());

    let ascii = dir.path().join("relief_ascii.stl");
    write_stl(&solid, &ascii, StlMode::Ascii).unwrap();
    let text = std::fs::read_to_string(&ascii).unwrap();
    assert!(text.starts_with("solid relief_ascii\n"));
}

#[test]
fn empty_solid_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.stl");
    for mode in [StlMode::Binary, StlMode::Ascii] {
        let err = write_stl(&Solid::new(), &path, mode).unwrap_err();
        assert!(matches!(err, LayerforgeError::EmptyMesh));
        assert!(!path.exists());
    }
}

#[test]
fn stats_match_written_solid() {
    let stats = relief().stats().unwrap();
    assert_eq!(stats.face_count, ReliefBuilder::face_count(8, 8));
    assert_eq!(stats.vertex_count, 3 * stats.face_count);
    assert!(approx_eq(stats.max[0], 100.0, 1e-9));
    assert!(approx_eq(stats.max[1], 80.0, 1e-9));
    assert!(approx_eq(stats.max[2], 2.16, 1e-9));
    assert_eq!(stats.min, [0.0, 0.0, 0.0]);
}

#[test]
fn export_request_with_border() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("framed.stl");

    let field = sweep_field(16, 12, 0.48, 2.24);
    let config = MeshConfig {
        has_border: true,
        border_width_mm: 5.0,
        width_mm: 100.0,
        height_mm: 80.0,
        ..Default::default()
    };
    let request = MeshRequest::from_json(&MeshRequest::new(&field, config).to_json().unwrap()).unwrap();

    let stats = export_mesh(&request, &path, StlMode::Binary).unwrap();
    assert_eq!(stats.face_count, ReliefBuilder::face_count(16, 12) + 48);
    assert!(approx_eq(stats.max[0] - stats.min[0], 110.0, 1e-9));
    assert!(approx_eq(stats.max[1] - stats.min[1], 90.0, 1e-9));
    assert_eq!(
        std::fs::metadata(&path).unwrap().len() as usize,
        binary_size(stats.face_count)
    );
}

#[test]
fn export_respects_mesh_resolution_and_detail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coarse.stl");

    let field = sweep_field(64, 32, 0.48, 2.24);
    let config = MeshConfig {
        mesh_resolution: Some(16),
        detail_size: 0.5,
        ..Default::default()
    };
    let request = MeshRequest::new(&field, config.clone());
    let stats = export_mesh(&request, &path, StlMode::Ascii).unwrap();
    assert_eq!(stats.face_count, ReliefBuilder::face_count(16, 8));

    let direct = generate_mesh(&HeightField::from_base64(&request.heightmap_base64, 64, 32).unwrap(), &config)
        .unwrap();
    assert_eq!(direct.stats().unwrap(), stats);
}

#[test]
fn malformed_request_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.stl");
    let request = MeshRequest {
        heightmap_base64: "AAAA".into(),
        width: 2,
        height: 2,
        config: MeshConfig::default(),
    };
    assert!(matches!(
        export_mesh(&request, &path, StlMode::Binary),
        Err(LayerforgeError::MalformedInput(_))
    ));
    assert!(!path.exists());
}
