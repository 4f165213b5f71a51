//! Input boundary: triangle meshes as handed over by a scene loader.
//!
//! Positions are already world-transformed. UVs, vertex colors and per-triangle
//! material indices are optional. Loading and validating scene files happens
//! before any of these types are built.

use crate::color::Color;
use crate::math::{BoundingBox, Vector3};
use std::sync::Arc;

/// Vertical origin of texture pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureOrigin {
    /// Row 0 is the top of the image; UV `v` is flipped before lookup.
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the image; UV `v` is used as-is.
    BottomLeft,
}

/// Pixel source of a texture.
#[derive(Debug, Clone)]
pub enum TextureData {
    /// Raw RGBA8 pixels, row-major, `width * height * 4` bytes.
    Rgba {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// Encoded image bytes (PNG, JPEG). Decoded lazily once per conversion.
    Encoded(Vec<u8>),
}

/// A texture image referenced by a material.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub data: TextureData,
    pub origin: TextureOrigin,
}

impl Texture {
    pub fn from_rgba(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: TextureData::Rgba {
                width,
                height,
                pixels,
            },
            origin: TextureOrigin::default(),
        }
    }

    pub fn from_encoded(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data: TextureData::Encoded(bytes),
            origin: TextureOrigin::default(),
        }
    }

    pub fn with_origin(mut self, origin: TextureOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Material attached to a mesh.
#[derive(Debug, Clone)]
pub enum MaterialRef {
    /// Flat color.
    Flat(Color),
    /// Image texture sampled by UV.
    Textured(Arc<Texture>),
    /// Multi-material mesh; triangles select an entry by material index.
    Indexed(Vec<MaterialRef>),
    /// Material without an exposed color channel (e.g. a custom shader).
    Opaque,
}

impl MaterialRef {
    /// Pick the concrete material for a hit.
    ///
    /// Arrays resolve to the entry at `index`, or their first entry when the
    /// index is absent or out of range. Returns `None` for an empty array.
    pub fn select(&self, index: Option<usize>) -> Option<&MaterialRef> {
        match self {
            MaterialRef::Indexed(materials) => {
                let chosen = index
                    .and_then(|i| materials.get(i))
                    .or_else(|| materials.first())?;
                chosen.select(index)
            }
            other => Some(other),
        }
    }

    /// Every texture reachable from this material.
    pub fn textures(&self) -> Vec<&Arc<Texture>> {
        match self {
            MaterialRef::Textured(texture) => vec![texture],
            MaterialRef::Indexed(materials) => {
                materials.iter().flat_map(|m| m.textures()).collect()
            }
            MaterialRef::Flat(_) | MaterialRef::Opaque => Vec::new(),
        }
    }
}

/// One triangle mesh in world space.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    pub name: String,
    pub positions: Vec<Vector3>,
    pub indices: Vec<[u32; 3]>,
    /// UV0, one entry per vertex.
    pub uvs: Option<Vec<[f64; 2]>>,
    /// Per-vertex colors, one entry per vertex.
    pub colors: Option<Vec<Color>>,
    /// Material index per triangle, for [`MaterialRef::Indexed`] materials.
    pub material_indices: Option<Vec<usize>>,
    pub material: MaterialRef,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vector3>, indices: Vec<[u32; 3]>, material: MaterialRef) -> Self {
        Self {
            name: String::new(),
            positions,
            indices,
            uvs: None,
            colors: None,
            material_indices: None,
            material,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<[f64; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_material_indices(mut self, indices: Vec<usize>) -> Self {
        self.material_indices = Some(indices);
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// World-space corners of triangle `i`, or `None` if any index is out of range.
    pub fn triangle(&self, i: usize) -> Option<[Vector3; 3]> {
        let [a, b, c] = *self.indices.get(i)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    /// True when the mesh carries drawable geometry with in-range indices.
    pub fn has_geometry(&self) -> bool {
        let n = self.positions.len() as u32;
        !self.indices.is_empty() && self.indices.iter().flatten().all(|&i| i < n)
    }

    /// Bounds of the referenced vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter())
    }

    /// Closed axis-aligned box spanning `min..min + size`, 12 triangles.
    pub fn cuboid(min: Vector3, size: Vector3, material: MaterialRef) -> Self {
        let corner = |x: f64, y: f64, z: f64| {
            Vector3::new(min.x + x * size.x, min.y + y * size.y, min.z + z * size.z)
        };
        let positions = vec![
            corner(0.0, 0.0, 0.0),
            corner(1.0, 0.0, 0.0),
            corner(1.0, 1.0, 0.0),
            corner(0.0, 1.0, 0.0),
            corner(0.0, 0.0, 1.0),
            corner(1.0, 0.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(0.0, 1.0, 1.0),
        ];
        let indices = vec![
            // -z
            [0, 2, 1],
            [0, 3, 2],
            // +z
            [4, 5, 6],
            [4, 6, 7],
            // -y
            [0, 1, 5],
            [0, 5, 4],
            // +y
            [3, 7, 6],
            [3, 6, 2],
            // -x
            [0, 4, 7],
            [0, 7, 3],
            // +x
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self::new(positions, indices, material).with_name("cuboid")
    }
}
