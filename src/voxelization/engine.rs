use super::color_sampler::{ColorResolver, TextureCache};
use super::fill::fill_interior;
use super::grid::create_grid;
use super::intersector::{BvhIntersector, Intersector};
use super::{
    ColorSamplingMode, Result, Voxel, VoxelGrid, VoxelizationOptions, VoxelizeError,
};
use crate::color::{average_colors, dominant_color, Color};
use crate::math::{BoundingBox, Vector3};
use crate::mesh::TriangleMesh;

/// Cells scanned between two progress reports.
const SCAN_BATCH: usize = 1024;

const PROGRESS_EXTRACTED: f64 = 10.0;
const PROGRESS_PREPARED: f64 = 20.0;
const PROGRESS_SCAN_START: f64 = 30.0;
const PROGRESS_SCAN_END: f64 = 90.0;

/// Runs one voxelization pass and reports progress on the calling thread.
///
/// Progress values are percentages in `[0, 100]`, never decreasing. For every
/// call the first reported value is 0 and the last is 100.
pub struct VoxelizationEngine<'a> {
    options: VoxelizationOptions,
    on_progress: Option<Box<dyn FnMut(f64) + 'a>>,
    last_progress: f64,
}

impl<'a> VoxelizationEngine<'a> {
    pub fn new(options: VoxelizationOptions) -> Self {
        Self {
            options,
            on_progress: None,
            last_progress: 0.0,
        }
    }

    /// Set a callback receiving progress percentages.
    pub fn set_progress_callback(&mut self, cb: Box<dyn FnMut(f64) + 'a>) {
        self.on_progress = Some(cb);
    }

    pub fn with_progress_callback(mut self, cb: impl FnMut(f64) + 'a) -> Self {
        self.set_progress_callback(Box::new(cb));
        self
    }

    pub fn options(&self) -> &VoxelizationOptions {
        &self.options
    }

    /// Voxelize `meshes` using the built-in BVH intersector.
    ///
    /// Meshes without usable geometry are skipped.
    pub fn voxelize(&mut self, meshes: &[TriangleMesh]) -> Result<VoxelGrid> {
        self.last_progress = 0.0;
        self.report(0.0);

        let extracted: Vec<&TriangleMesh> = meshes
            .iter()
            .enumerate()
            .filter(|(i, mesh)| {
                let ok = mesh.has_geometry();
                if !ok {
                    log::warn!("Skipping mesh {} ('{}'): no usable geometry", i, mesh.name);
                }
                ok
            })
            .map(|(_, mesh)| mesh)
            .collect();

        if extracted.is_empty() {
            self.report(100.0);
            return Ok(VoxelGrid::empty(self.resolution()));
        }
        self.report(PROGRESS_EXTRACTED);

        let intersector = BvhIntersector::build(extracted.iter().copied())?;
        self.run(&extracted, &intersector)
    }

    /// Voxelize `meshes` with a caller-supplied intersector prepared for
    /// exactly this mesh slice.
    pub fn voxelize_with<I: Intersector>(
        &mut self,
        meshes: &[TriangleMesh],
        intersector: &I,
    ) -> Result<VoxelGrid> {
        self.last_progress = 0.0;
        self.report(0.0);

        if meshes.is_empty() {
            self.report(100.0);
            return Ok(VoxelGrid::empty(self.resolution()));
        }
        if intersector.mesh_count() != meshes.len() {
            return Err(VoxelizeError::Intersector(format!(
                "intersector prepared for {} meshes, got {}",
                intersector.mesh_count(),
                meshes.len()
            )));
        }
        self.report(PROGRESS_EXTRACTED);

        let meshes: Vec<&TriangleMesh> = meshes.iter().collect();
        self.run(&meshes, intersector)
    }

    fn resolution(&self) -> u32 {
        let clamped = self.options.clamped_resolution();
        if clamped != self.options.resolution {
            log::warn!(
                "Resolution {} out of range, clamped to {}",
                self.options.resolution,
                clamped
            );
        }
        clamped
    }

    fn run<I: Intersector>(
        &mut self,
        meshes: &[&TriangleMesh],
        intersector: &I,
    ) -> Result<VoxelGrid> {
        let resolution = self.resolution();

        let cache = TextureCache::for_meshes(meshes.iter().copied());
        let resolver = ColorResolver::new(&cache);
        self.report(PROGRESS_PREPARED);

        let bounding_box = meshes
            .iter()
            .filter_map(|m| m.bounding_box())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(BoundingBox::degenerate);
        let grid = create_grid(&bounding_box, resolution);
        log::debug!(
            "Voxelizing {} meshes on a {}x{}x{} grid (voxel size {:.5})",
            meshes.len(),
            grid.dims[0],
            grid.dims[1],
            grid.dims[2],
            grid.voxel_size
        );
        self.report(PROGRESS_SCAN_START);

        let sampler = CellSampler {
            meshes,
            intersector,
            resolver: &resolver,
            voxel_size: grid.voxel_size,
            mode: self.options.color_sampling_mode,
        };

        let total = grid.cell_count();
        let mut cells: Vec<Option<Color>> = Vec::with_capacity(total);
        for batch in grid.centers.chunks(SCAN_BATCH) {
            cells.extend(sampler.scan(batch)?);
            let done = cells.len() as f64 / total as f64;
            self.report(PROGRESS_SCAN_START + done * (PROGRESS_SCAN_END - PROGRESS_SCAN_START));
        }
        self.report(PROGRESS_SCAN_END);

        if self.options.fill_interior {
            let filled = fill_interior(&grid, &mut cells);
            log::debug!("Filled {} interior cells", filled);
        }

        let voxels: Vec<Voxel> = cells
            .iter()
            .zip(&grid.centers)
            .filter_map(|(cell, center)| {
                cell.map(|color| Voxel {
                    position: *center,
                    color,
                })
            })
            .collect();
        log::debug!("Produced {} voxels from {} cells", voxels.len(), total);

        self.report(100.0);
        Ok(VoxelGrid {
            resolution,
            voxels,
            bounding_box,
        })
    }

    fn report(&mut self, value: f64) {
        let value = value.clamp(0.0, 100.0).max(self.last_progress);
        self.last_progress = value;
        if let Some(cb) = self.on_progress.as_mut() {
            cb(value);
        }
    }
}

struct CellSampler<'s, I> {
    meshes: &'s [&'s TriangleMesh],
    intersector: &'s I,
    resolver: &'s ColorResolver<'s>,
    voxel_size: f64,
    mode: ColorSamplingMode,
}

impl<I: Intersector> CellSampler<'_, I> {
    #[cfg(not(target_arch = "wasm32"))]
    fn scan(&self, centers: &[Vector3]) -> Result<Vec<Option<Color>>> {
        use rayon::prelude::*;
        centers.par_iter().map(|c| self.sample(c)).collect()
    }

    #[cfg(target_arch = "wasm32")]
    fn scan(&self, centers: &[Vector3]) -> Result<Vec<Option<Color>>> {
        centers.iter().map(|c| self.sample(c)).collect()
    }

    /// Color of the cell centered at `center`, or `None` if no surface lies
    /// within one voxel edge along any axis direction.
    ///
    /// Per direction, the first mesh (in input order) with an in-range hit
    /// wins, even if a later mesh is closer.
    fn sample(&self, center: &Vector3) -> Result<Option<Color>> {
        let mut hits: Vec<(f64, Color)> = Vec::with_capacity(Vector3::AXES.len());

        for dir in &Vector3::AXES {
            for (i, mesh) in self.meshes.iter().enumerate() {
                let Some(hit) = self.intersector.cast_ray(i, center, dir, self.voxel_size)? else {
                    continue;
                };
                if hit.distance <= self.voxel_size {
                    hits.push((hit.distance, self.resolver.resolve(mesh, &hit)));
                    break;
                }
            }
        }

        if hits.is_empty() {
            return Ok(None);
        }
        Ok(Some(combine_hits(self.mode, &hits)))
    }
}

fn combine_hits(mode: ColorSamplingMode, hits: &[(f64, Color)]) -> Color {
    match mode {
        ColorSamplingMode::Average => {
            let colors: Vec<Color> = hits.iter().map(|(_, c)| *c).collect();
            average_colors(&colors)
        }
        ColorSamplingMode::Dominant => {
            let colors: Vec<Color> = hits.iter().map(|(_, c)| *c).collect();
            dominant_color(&colors)
        }
        ColorSamplingMode::Nearest => hits
            .iter()
            .fold(None, |best: Option<(f64, Color)>, &(d, c)| match best {
                Some((bd, _)) if bd <= d => best,
                _ => Some((d, c)),
            })
            .map(|(_, c)| c)
            .unwrap_or(Color::WHITE),
    }
}

/// Voxelize `meshes` without progress reporting.
pub fn voxelize(meshes: &[TriangleMesh], options: &VoxelizationOptions) -> Result<VoxelGrid> {
    VoxelizationEngine::new(options.clone()).voxelize(meshes)
}

/// Voxelize `meshes`, reporting progress percentages to `on_progress`.
pub fn voxelize_with_progress(
    meshes: &[TriangleMesh],
    options: &VoxelizationOptions,
    on_progress: impl FnMut(f64),
) -> Result<VoxelGrid> {
    VoxelizationEngine::new(options.clone())
        .with_progress_callback(on_progress)
        .voxelize(meshes)
}

/// Voxelize `meshes` against a caller-supplied intersector.
pub fn voxelize_with<I: Intersector>(
    meshes: &[TriangleMesh],
    intersector: &I,
    options: &VoxelizationOptions,
    on_progress: impl FnMut(f64),
) -> Result<VoxelGrid> {
    VoxelizationEngine::new(options.clone())
        .with_progress_callback(on_progress)
        .voxelize_with(meshes, intersector)
}
