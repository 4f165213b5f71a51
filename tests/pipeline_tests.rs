use blockvox::export::bbmodel::BbModel;
use blockvox::export::java_block::JavaBlockModel;
use blockvox::voxelization::voxelize;
use blockvox::{
    convert, convert_with_settings, Color, Dialect, ExportSettings, MaterialRef, TriangleMesh,
    Vector3, VoxelizationOptions,
};

const RED: Color = Color::new(255, 0, 0);

fn red_cube() -> TriangleMesh {
    TriangleMesh::cuboid(
        Vector3::ZERO,
        Vector3::new(1.0, 1.0, 1.0),
        MaterialRef::Flat(RED),
    )
}

#[test]
fn test_red_cube_to_block_model() {
    let meshes = [red_cube()];
    let options = VoxelizationOptions::new().with_resolution(8);

    let grid = voxelize(&meshes, &options).unwrap();
    assert!(grid.voxels.iter().all(|v| v.color == RED));

    let files = convert(&meshes, &options, Dialect::JavaBlock, |_| {}).unwrap();
    let model: JavaBlockModel = serde_json::from_slice(&files[0].bytes).unwrap();

    assert_eq!(model.textures["texture"], "texture.png");
    assert!(model.credit.contains("Blockbench Converter"));
    assert_eq!(model.elements.len(), grid.voxels.len());

    // single color: every face maps the whole first atlas cell
    let uv = model.elements[0].faces.up.uv;
    assert!(model.elements.iter().all(|e| e.faces.south.uv == uv));

    let texture = image::load_from_memory(&files[1].bytes).unwrap().to_rgba8();
    assert_eq!(texture.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn test_red_cube_to_bbmodel() {
    let meshes = [red_cube()];
    let options = VoxelizationOptions::new().with_resolution(8);
    let settings = ExportSettings::new().with_name("cube");

    let mut progress = Vec::new();
    let files = convert_with_settings(&meshes, &options, Dialect::BbModel, &settings, |p| {
        progress.push(p)
    })
    .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "cube.bbmodel");
    let model: BbModel = serde_json::from_slice(&files[0].bytes).unwrap();
    let voxel_count = voxelize(&meshes, &options).unwrap().voxels.len();
    assert_eq!(model.elements.len(), voxel_count);
    assert_eq!(model.outliner.len(), voxel_count);

    assert_eq!(progress.first(), Some(&0.0));
    assert_eq!(progress.last(), Some(&100.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_options_from_settings_json() {
    let options =
        VoxelizationOptions::from_json(r#"{"resolution": 12, "fillInterior": true}"#).unwrap();
    let files = convert(&[red_cube()], &options, Dialect::JavaBlock, |_| {}).unwrap();
    let model: JavaBlockModel = serde_json::from_slice(&files[0].bytes).unwrap();
    assert!(!model.elements.is_empty());
    assert!(model.elements.len() <= 12 * 12 * 12);
}

#[test]
fn test_empty_scene_in_both_dialects() {
    let options = VoxelizationOptions::default();
    for dialect in [Dialect::JavaBlock, Dialect::BbModel] {
        let files = convert(&[], &options, dialect, |_| {}).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&files[0].bytes).unwrap();
        assert_eq!(json["elements"].as_array().map(Vec::len), Some(0));
    }
}

#[test]
fn test_two_separate_meshes() {
    let blue = Color::new(0, 0, 255);
    let meshes = [
        red_cube(),
        TriangleMesh::cuboid(
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            MaterialRef::Flat(blue),
        ),
    ];
    let options = VoxelizationOptions::new().with_resolution(24);
    let grid = voxelize(&meshes, &options).unwrap();

    assert!(grid.voxels.iter().any(|v| v.color == RED));
    assert!(grid.voxels.iter().any(|v| v.color == blue));
    for voxel in &grid.voxels {
        if voxel.position.x < 1.5 {
            assert_eq!(voxel.color, RED);
        } else {
            assert_eq!(voxel.color, blue);
        }
    }

    let files = convert(&meshes, &options, Dialect::BbModel, |_| {}).unwrap();
    let model: BbModel = serde_json::from_slice(&files[0].bytes).unwrap();
    assert_eq!(model.elements.len(), grid.voxels.len());
}
