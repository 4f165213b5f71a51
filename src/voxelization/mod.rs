//! Mesh-to-voxel conversion.
//!
//! A uniform grid is laid over the scene bounds, rays are cast from every cell
//! center along the six axis directions, and cells whose rays meet a surface
//! within one voxel edge become colored voxels.
//!
//! ```ignore
//! use blockvox::voxelization::{voxelize_with_progress, VoxelizationOptions};
//!
//! let options = VoxelizationOptions::new().with_resolution(32);
//! let grid = voxelize_with_progress(&meshes, &options, |p| println!("{:.0}%", p))?;
//! println!("{} voxels", grid.voxels.len());
//! ```

pub mod color_sampler;
pub mod engine;
pub mod fill;
pub mod grid;
pub mod intersector;

pub use color_sampler::{ColorResolver, TextureCache};
pub use engine::{voxelize, voxelize_with, voxelize_with_progress, VoxelizationEngine};
pub use grid::{create_grid, Grid};
pub use intersector::{BvhIntersector, Intersector, RayHit};

use crate::color::Color;
use crate::math::{BoundingBox, Vector3};
use serde::{Deserialize, Serialize};

pub const MIN_RESOLUTION: u32 = 8;
pub const MAX_RESOLUTION: u32 = 64;

/// Error type for voxelization.
#[derive(Debug, thiserror::Error)]
pub enum VoxelizeError {
    #[error("Intersector error: {0}")]
    Intersector(String),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, VoxelizeError>;

/// How the colors gathered by a cell's six rays are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSamplingMode {
    /// Rounded component-wise mean.
    #[default]
    Average,
    /// Most frequent color.
    Dominant,
    /// Color of the closest hit.
    Nearest,
}

/// Configuration for voxelization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoxelizationOptions {
    /// Cell count along the longest axis of the scene bounds (8-64).
    pub resolution: u32,
    /// Also emit voxels for cells enclosed by the surface.
    pub fill_interior: bool,
    pub color_sampling_mode: ColorSamplingMode,
}

impl Default for VoxelizationOptions {
    fn default() -> Self {
        Self {
            resolution: 16,
            fill_interior: false,
            color_sampling_mode: ColorSamplingMode::Average,
        }
    }
}

impl VoxelizationOptions {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON settings string. Missing fields take defaults.
    pub fn from_json(settings: &str) -> Result<Self> {
        serde_json::from_str(settings).map_err(|e| VoxelizeError::InvalidOptions(e.to_string()))
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fill_interior(mut self, enabled: bool) -> Self {
        self.fill_interior = enabled;
        self
    }

    pub fn with_color_sampling(mut self, mode: ColorSamplingMode) -> Self {
        self.color_sampling_mode = mode;
        self
    }

    /// Resolution forced into the supported range.
    pub fn clamped_resolution(&self) -> u32 {
        self.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION)
    }
}

/// One occupied grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    /// Cell center.
    pub position: Vector3,
    pub color: Color,
}

/// Sparse voxel set produced by one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoxelGrid {
    pub resolution: u32,
    /// Occupied cells in scan order.
    pub voxels: Vec<Voxel>,
    pub bounding_box: BoundingBox,
}

impl VoxelGrid {
    pub fn empty(resolution: u32) -> Self {
        Self {
            resolution,
            voxels: Vec::new(),
            bounding_box: BoundingBox::degenerate(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Edge length of one voxel, recomputed from the bounds and resolution.
    pub fn voxel_size(&self) -> f64 {
        crate::math::voxel_size(&self.bounding_box, self.resolution)
    }

    pub fn colors(&self) -> Vec<Color> {
        self.voxels.iter().map(|v| v.color).collect()
    }
}
