use blockvox::voxelization::{
    create_grid, voxelize, voxelize_with_progress, BvhIntersector, Intersector,
};
use blockvox::{
    BoundingBox, Color, ColorSamplingMode, MaterialRef, Texture, TriangleMesh, Vector3,
    VoxelizationOptions,
};
use std::sync::Arc;

const RED: Color = Color::new(255, 0, 0);
const BLUE: Color = Color::new(0, 0, 255);

// ── Helpers ──────────────────────────────────────────────────────────────────

fn unit_cube(material: MaterialRef) -> TriangleMesh {
    TriangleMesh::cuboid(Vector3::ZERO, Vector3::new(1.0, 1.0, 1.0), material)
}

fn options(resolution: u32) -> VoxelizationOptions {
    VoxelizationOptions::new().with_resolution(resolution)
}

/// Grid index along each axis of a unit-cube cell center.
fn cell_index(v: f64, resolution: u32) -> usize {
    (v * resolution as f64).floor() as usize
}

fn solid_png(color: Color) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(color.to_rgba()));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

// ── Empty input ──────────────────────────────────────────────────────────────

#[test]
fn test_empty_scene_yields_empty_grid() {
    let grid = voxelize(&[], &options(16)).unwrap();
    assert_eq!(grid.voxels.len(), 0);
    assert_eq!(grid.bounding_box.min, Vector3::ZERO);
    assert_eq!(grid.bounding_box.max, Vector3::ZERO);
}

// ── Red cube ─────────────────────────────────────────────────────────────────

#[test]
fn test_red_cube_voxels_are_red_shell() {
    let grid = voxelize(&[unit_cube(MaterialRef::Flat(RED))], &options(8)).unwrap();

    assert_eq!(grid.resolution, 8);
    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.len() <= 512);
    for voxel in &grid.voxels {
        assert_eq!(voxel.color, RED);
        let p = voxel.position.to_array();
        let on_shell = p.iter().any(|&v| {
            let i = cell_index(v, 8);
            i == 0 || i == 7
        });
        assert!(on_shell, "interior voxel at {:?}", p);
    }
}

#[test]
fn test_fill_interior_adds_voxels() {
    let meshes = [unit_cube(MaterialRef::Flat(RED))];
    let surface = voxelize(&meshes, &options(8)).unwrap();
    let filled = voxelize(&meshes, &options(8).with_fill_interior(true)).unwrap();

    assert!(filled.voxels.len() >= surface.voxels.len());
    assert!(filled.voxels.len() <= 512);
    assert!(filled.voxels.iter().all(|v| v.color == RED));
}

#[test]
fn test_voxels_within_expanded_bounds() {
    let mesh = TriangleMesh::cuboid(
        Vector3::new(-2.0, 1.0, 3.0),
        Vector3::new(3.0, 1.0, 2.0),
        MaterialRef::Flat(BLUE),
    );
    let grid = voxelize(&[mesh], &options(12)).unwrap();
    let bounds = grid.bounding_box.expanded(grid.voxel_size() / 2.0);

    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.iter().all(|v| bounds.contains(&v.position)));
}

#[test]
fn test_voxelization_is_deterministic() {
    let meshes = [unit_cube(MaterialRef::Flat(RED))];
    let a = voxelize(&meshes, &options(16)).unwrap();
    let b = voxelize(&meshes, &options(16)).unwrap();
    assert_eq!(a, b);
}

// ── Geometry edge cases ──────────────────────────────────────────────────────

#[test]
fn test_flat_plane_gives_one_cell_slab() {
    let plane = TriangleMesh::new(
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
        MaterialRef::Flat(RED),
    );
    let grid = voxelize(&[plane], &options(8)).unwrap();

    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.len() <= 64);
    assert!(grid
        .voxels
        .iter()
        .all(|v| (v.position.y - 0.0625).abs() < 1e-9));
}

#[test]
fn test_meshes_without_geometry_are_skipped() {
    let broken = TriangleMesh::new(vec![Vector3::ZERO], vec![[0, 1, 2]], MaterialRef::Flat(BLUE));
    let with_broken = voxelize(&[broken, unit_cube(MaterialRef::Flat(RED))], &options(8)).unwrap();
    let alone = voxelize(&[unit_cube(MaterialRef::Flat(RED))], &options(8)).unwrap();
    assert_eq!(with_broken.voxels, alone.voxels);
}

#[test]
fn test_first_mesh_wins_for_coincident_surfaces() {
    let meshes = [
        unit_cube(MaterialRef::Flat(RED)),
        unit_cube(MaterialRef::Flat(BLUE)),
    ];
    let grid = voxelize(&meshes, &options(8)).unwrap();
    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.iter().all(|v| v.color == RED));
}

// ── Color sources ────────────────────────────────────────────────────────────

#[test]
fn test_encoded_texture_colors() {
    let texture = Arc::new(Texture::from_encoded("blue", solid_png(BLUE)));
    let cube = unit_cube(MaterialRef::Textured(texture)).with_uvs(vec![[0.5, 0.5]; 8]);
    let grid = voxelize(&[cube], &options(8)).unwrap();
    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.iter().all(|v| v.color == BLUE));
}

#[test]
fn test_broken_texture_falls_back_to_white() {
    let texture = Arc::new(Texture::from_encoded("broken", b"not an image".to_vec()));
    let cube = unit_cube(MaterialRef::Textured(texture)).with_uvs(vec![[0.5, 0.5]; 8]);
    let grid = voxelize(&[cube], &options(8)).unwrap();
    assert!(grid.voxels.iter().all(|v| v.color == Color::WHITE));
}

#[test]
fn test_vertex_colors_are_interpolated() {
    let green = Color::new(0, 255, 0);
    let colors = vec![RED, RED, RED, RED, green, green, green, green];
    let cube = unit_cube(MaterialRef::Opaque).with_colors(colors);
    let grid = voxelize(&[cube], &options(8)).unwrap();

    assert!(!grid.voxels.is_empty());
    assert!(grid.voxels.iter().all(|v| v.color.b == 0));
    let first = grid.voxels[0].color;
    assert!(grid.voxels.iter().any(|v| v.color != first));
}

#[test]
fn test_sampling_modes_agree_on_solid_color() {
    let meshes = [unit_cube(MaterialRef::Flat(RED))];
    for mode in [
        ColorSamplingMode::Average,
        ColorSamplingMode::Dominant,
        ColorSamplingMode::Nearest,
    ] {
        let grid = voxelize(&meshes, &options(8).with_color_sampling(mode)).unwrap();
        assert!(grid.voxels.iter().all(|v| v.color == RED), "{:?}", mode);
    }
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[test]
fn test_progress_monotonic() {
    let mut progress = Vec::new();
    voxelize_with_progress(&[unit_cube(MaterialRef::Flat(RED))], &options(24), |p| {
        progress.push(p)
    })
    .unwrap();

    assert!(progress.len() >= 3);
    assert_eq!(progress.first(), Some(&0.0));
    assert_eq!(progress.last(), Some(&100.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
}

// ── Building blocks ──────────────────────────────────────────────────────────

#[test]
fn test_grid_edge_times_cells_matches_longest_axis() {
    let bbox = BoundingBox::new(Vector3::new(-1.0, 0.0, 2.0), Vector3::new(2.5, 1.2, 2.7));
    for resolution in 8..=64 {
        let grid = create_grid(&bbox, resolution);
        assert!(grid.dims.iter().all(|&d| d >= 1));
        let max_cells = *grid.dims.iter().max().unwrap() as f64;
        assert!((grid.voxel_size * max_cells - 3.5).abs() < 1e-6);
    }
}

#[test]
fn test_bvh_intersector_finds_cube_face() {
    let meshes = [unit_cube(MaterialRef::Flat(RED))];
    let intersector = BvhIntersector::build(&meshes).unwrap();
    let hit = intersector
        .cast_ray(
            0,
            &Vector3::new(0.3, 0.6, 0.5),
            &Vector3::new(0.0, 1.0, 0.0),
            1.0,
        )
        .unwrap()
        .unwrap();
    assert!((hit.distance - 0.4).abs() < 1e-9);
    assert!(hit.triangle.is_some());
}
