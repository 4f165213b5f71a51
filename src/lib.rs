//! Convert triangle-mesh scenes into block models.
//!
//! The pipeline has two stages:
//!
//! 1. [`voxelization`] lays a uniform grid over the scene and keeps every cell
//!    whose axis rays meet a surface within one voxel edge, colored from the
//!    surface's texture, vertex colors or material.
//! 2. [`export`] packs the unique voxel colors into a texture atlas and writes
//!    one cuboid per voxel, either as a Minecraft block model
//!    (`model.json` + `texture.png`) or as a self-contained Blockbench
//!    `.bbmodel` project.
//!
//! ```ignore
//! use blockvox::{convert, Dialect, MaterialRef, TriangleMesh, Vector3, VoxelizationOptions};
//!
//! let cube = TriangleMesh::cuboid(
//!     Vector3::ZERO,
//!     Vector3::new(1.0, 1.0, 1.0),
//!     MaterialRef::Flat((255, 0, 0).into()),
//! );
//! let options = VoxelizationOptions::new().with_resolution(16);
//! let files = convert(&[cube], &options, Dialect::BbModel, |p| println!("{:.0}%", p))?;
//! for file in files {
//!     std::fs::write(&file.name, &file.bytes)?;
//! }
//! ```
//!
//! Loading scene files and bundling the output are left to the caller.

pub mod color;
pub mod export;
pub mod math;
pub mod mesh;
pub mod voxelization;

pub use color::Color;
pub use export::{Dialect, ExportError, ExportSettings, ExportedFile};
pub use math::{BoundingBox, Vector3};
pub use mesh::{MaterialRef, Texture, TextureData, TextureOrigin, TriangleMesh};
pub use voxelization::{
    ColorSamplingMode, Voxel, VoxelGrid, VoxelizationOptions, VoxelizeError,
};

/// Error type for the end-to-end pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Voxelize(#[from] VoxelizeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Voxelize `meshes` and export the result in `dialect` with default export
/// settings.
///
/// `on_progress` receives voxelization progress in `[0, 100]`.
pub fn convert(
    meshes: &[TriangleMesh],
    options: &VoxelizationOptions,
    dialect: Dialect,
    on_progress: impl FnMut(f64),
) -> Result<Vec<ExportedFile>> {
    convert_with_settings(meshes, options, dialect, &ExportSettings::default(), on_progress)
}

/// [`convert`] with explicit export settings.
pub fn convert_with_settings(
    meshes: &[TriangleMesh],
    options: &VoxelizationOptions,
    dialect: Dialect,
    settings: &ExportSettings,
    on_progress: impl FnMut(f64),
) -> Result<Vec<ExportedFile>> {
    let grid = voxelization::voxelize_with_progress(meshes, options, on_progress)?;
    log::debug!(
        "Voxelized {} meshes into {} voxels, exporting as {}",
        meshes.len(),
        grid.voxels.len(),
        dialect.name()
    );
    Ok(export::export(&grid, dialect, settings)?)
}
