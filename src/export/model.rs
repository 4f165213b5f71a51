//! Dialect-neutral cuboid generation.
//!
//! Voxel centers are mapped into block-model space: the grid bounds are scaled
//! uniformly so the longest axis spans 16 units, with the minimum corner at the
//! origin. Every coordinate is rounded to two decimals.

use super::texture::{ColorAtlas, UvUnits};
use crate::math::{voxel_size, BoundingBox, Vector3};
use crate::voxelization::VoxelGrid;
use serde::{Deserialize, Serialize};

/// Span of the longest model axis after normalization.
pub const MODEL_SPAN: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceDirection {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl FaceDirection {
    /// Serialization order.
    pub const ALL: [FaceDirection; 6] = [
        FaceDirection::Down,
        FaceDirection::Up,
        FaceDirection::North,
        FaceDirection::South,
        FaceDirection::West,
        FaceDirection::East,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaceDirection::Down => "down",
            FaceDirection::Up => "up",
            FaceDirection::North => "north",
            FaceDirection::South => "south",
            FaceDirection::West => "west",
            FaceDirection::East => "east",
        }
    }
}

/// One value per cuboid face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faces<F> {
    pub down: F,
    pub up: F,
    pub north: F,
    pub south: F,
    pub west: F,
    pub east: F,
}

impl<F: Clone> Faces<F> {
    pub fn uniform(face: F) -> Self {
        Self {
            down: face.clone(),
            up: face.clone(),
            north: face.clone(),
            south: face.clone(),
            west: face.clone(),
            east: face,
        }
    }
}

impl<F> Faces<F> {
    pub fn get(&self, direction: FaceDirection) -> &F {
        match direction {
            FaceDirection::Down => &self.down,
            FaceDirection::Up => &self.up,
            FaceDirection::North => &self.north,
            FaceDirection::South => &self.south,
            FaceDirection::West => &self.west,
            FaceDirection::East => &self.east,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FaceDirection, &F)> {
        FaceDirection::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Axis-aligned box for one voxel, in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub from: [f64; 3],
    pub to: [f64; 3],
    /// Shared by all six faces.
    pub uv: [f64; 4],
    /// Atlas index of the voxel color.
    pub color_index: usize,
}

/// Viewer placement hint for one display context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    pub rotation: [f64; 3],
    pub translation: [f64; 3],
    pub scale: [f64; 3],
}

impl DisplayTransform {
    const fn new(rotation: [f64; 3], translation: [f64; 3], scale: f64) -> Self {
        Self {
            rotation,
            translation,
            scale: [scale, scale, scale],
        }
    }
}

/// Display presets embedded in every exported model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPresets {
    pub gui: DisplayTransform,
    pub ground: DisplayTransform,
    pub fixed: DisplayTransform,
    pub thirdperson_righthand: DisplayTransform,
    pub firstperson_righthand: DisplayTransform,
}

pub const DISPLAY_PRESETS: DisplayPresets = DisplayPresets {
    gui: DisplayTransform::new([30.0, 225.0, 0.0], [0.0, 0.0, 0.0], 0.625),
    ground: DisplayTransform::new([0.0, 0.0, 0.0], [0.0, 3.0, 0.0], 0.25),
    fixed: DisplayTransform::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.5),
    thirdperson_righthand: DisplayTransform::new([75.0, 45.0, 0.0], [0.0, 2.5, 0.0], 0.375),
    firstperson_righthand: DisplayTransform::new([0.0, 45.0, 0.0], [0.0, 0.0, 0.0], 0.4),
};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Normalized `(from, to)` of the voxel centered at `position`.
pub fn normalized_bounds(
    position: &Vector3,
    voxel_size: f64,
    bbox: &BoundingBox,
) -> ([f64; 3], [f64; 3]) {
    let max_dim = bbox.max_dimension();
    let scale = MODEL_SPAN / if max_dim > 0.0 { max_dim } else { 1.0 };
    let center = (*position - bbox.min) * scale;
    let half = voxel_size * scale / 2.0;

    let c = center.to_array();
    (c.map(|v| round2(v - half)), c.map(|v| round2(v + half)))
}

/// Raw `(from, to)` of the voxel centered at `position`, without
/// normalization or rounding.
pub fn cuboid_bounds(position: &Vector3, voxel_size: f64) -> ([f64; 3], [f64; 3]) {
    let half = voxel_size / 2.0;
    let c = position.to_array();
    (c.map(|v| v - half), c.map(|v| v + half))
}

/// One normalized cuboid per voxel, in voxel order.
pub fn cuboids(grid: &VoxelGrid, atlas: &ColorAtlas, units: UvUnits) -> Vec<Cuboid> {
    let edge = voxel_size(&grid.bounding_box, grid.resolution);

    grid.voxels
        .iter()
        .map(|voxel| {
            let (from, to) = normalized_bounds(&voxel.position, edge, &grid.bounding_box);
            let color_index = atlas.index_of(&voxel.color).unwrap_or(0);
            // colors missing from the atlas map the whole texture
            let uv = atlas
                .uv(color_index, units)
                .unwrap_or_else(|| atlas.full_uv(units));
            Cuboid {
                from,
                to,
                uv,
                color_index,
            }
        })
        .collect()
}
