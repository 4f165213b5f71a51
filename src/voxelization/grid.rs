//! Uniform grid construction over a bounding box.

use crate::math::{voxel_size, BoundingBox, Vector3};

/// Cell centers of a uniform grid, x outermost, z innermost.
#[derive(Debug, Clone)]
pub struct Grid {
    pub centers: Vec<Vector3>,
    pub voxel_size: f64,
    /// Cell counts along x, y, z. Each is at least 1.
    pub dims: [usize; 3],
}

impl Grid {
    pub fn cell_count(&self) -> usize {
        self.centers.len()
    }

    /// Flat index of cell `(x, y, z)`.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims[1] + y) * self.dims[2] + z
    }

    /// Inverse of [`Grid::index`].
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let z = index % self.dims[2];
        let y = (index / self.dims[2]) % self.dims[1];
        let x = index / (self.dims[1] * self.dims[2]);
        [x, y, z]
    }
}

/// Lay a grid over `bbox` with `resolution` cells along its longest axis.
///
/// Axes with zero extent still get one cell, so flat meshes yield a one-cell
/// thick slab. A box with no extent at all uses a longest axis of 1.
pub fn create_grid(bbox: &BoundingBox, resolution: u32) -> Grid {
    let size = bbox.size();
    let edge = voxel_size(bbox, resolution);

    // `size / (size / n)` can land a hair above n.
    let count = |axis: f64| -> usize { ((axis / edge - 1e-9).ceil() as usize).max(1) };
    let dims = [count(size.x), count(size.y), count(size.z)];

    let mut centers = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
    for x in 0..dims[0] {
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                centers.push(Vector3::new(
                    bbox.min.x + (x as f64 + 0.5) * edge,
                    bbox.min.y + (y as f64 + 0.5) * edge,
                    bbox.min.z + (z as f64 + 0.5) * edge,
                ));
            }
        }
    }

    Grid {
        centers,
        voxel_size: edge,
        dims,
    }
}
