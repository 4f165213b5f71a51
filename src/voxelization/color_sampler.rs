//! Surface color resolution for ray hits.
//!
//! Priority, first match wins:
//! 1. texture lookup at the hit UV,
//! 2. barycentric interpolation of per-vertex colors,
//! 3. flat material color,
//! 4. white.

use super::intersector::RayHit;
use crate::color::Color;
use crate::math::barycentric;
use crate::mesh::{MaterialRef, Texture, TextureData, TextureOrigin, TriangleMesh};
use image::RgbaImage;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Decoded pixels of encoded textures, scoped to one conversion.
///
/// Filled up front so the scan can read it from any thread without locking.
/// Entries are keyed by texture identity (the `Arc` allocation).
#[derive(Default)]
pub struct TextureCache {
    decoded: FxHashMap<usize, Option<RgbaImage>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every encoded texture referenced by `meshes`.
    pub fn for_meshes<'m>(meshes: impl IntoIterator<Item = &'m TriangleMesh>) -> Self {
        let mut cache = Self::new();
        for mesh in meshes {
            for texture in mesh.material.textures() {
                cache.warm(texture);
            }
        }
        cache
    }

    /// Decode `texture` if it is encoded and not cached yet.
    pub fn warm(&mut self, texture: &Arc<Texture>) {
        let TextureData::Encoded(bytes) = &texture.data else {
            return;
        };
        self.decoded.entry(texture_key(texture)).or_insert_with(|| {
            match image::load_from_memory(bytes) {
                Ok(img) => Some(img.to_rgba8()),
                Err(e) => {
                    log::warn!("Failed to decode texture '{}': {}", texture.name, e);
                    None
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }

    /// Sample `texture` at `uv`. `None` if its pixels are unavailable.
    pub fn sample(&self, texture: &Arc<Texture>, uv: [f64; 2]) -> Option<Color> {
        match &texture.data {
            TextureData::Rgba {
                width,
                height,
                pixels,
            } => sample_pixels(*width, *height, pixels, uv, texture.origin),
            TextureData::Encoded(_) => {
                let img = self.decoded.get(&texture_key(texture))?.as_ref()?;
                sample_pixels(img.width(), img.height(), img.as_raw(), uv, texture.origin)
            }
        }
    }
}

fn texture_key(texture: &Arc<Texture>) -> usize {
    Arc::as_ptr(texture) as usize
}

/// Nearest-pixel lookup. Coordinates wrap, so UVs outside `[0, 1)` repeat.
fn sample_pixels(
    width: u32,
    height: u32,
    pixels: &[u8],
    uv: [f64; 2],
    origin: TextureOrigin,
) -> Option<Color> {
    if width == 0 || height == 0 {
        return None;
    }
    let v = match origin {
        TextureOrigin::TopLeft => 1.0 - uv[1],
        TextureOrigin::BottomLeft => uv[1],
    };
    let (w, h) = (width as i64, height as i64);
    let x = ((uv[0] * w as f64).floor() as i64).rem_euclid(w);
    let y = ((v * h as f64).floor() as i64).rem_euclid(h);

    let idx = ((y * w + x) * 4) as usize;
    let px = pixels.get(idx..idx + 3)?;
    Some(Color::new(px[0], px[1], px[2]))
}

/// Resolves the color of a ray hit on a mesh.
pub struct ColorResolver<'a> {
    cache: &'a TextureCache,
}

impl<'a> ColorResolver<'a> {
    pub fn new(cache: &'a TextureCache) -> Self {
        Self { cache }
    }

    pub fn resolve(&self, mesh: &TriangleMesh, hit: &RayHit) -> Color {
        let material = mesh.material.select(hit.material_index);

        if let (Some(uv), Some(MaterialRef::Textured(texture))) = (hit.uv, material) {
            if let Some(color) = self.cache.sample(texture, uv) {
                return color;
            }
        }

        if let Some(color) = vertex_color(mesh, hit) {
            return color;
        }

        match material {
            Some(MaterialRef::Flat(color)) => *color,
            _ => Color::WHITE,
        }
    }
}

fn vertex_color(mesh: &TriangleMesh, hit: &RayHit) -> Option<Color> {
    let colors = mesh.colors.as_ref()?;
    let face = hit.face?;
    let ca = *colors.get(face[0] as usize)?;
    let cb = *colors.get(face[1] as usize)?;
    let cc = *colors.get(face[2] as usize)?;

    let weights = hit.triangle.and_then(|t| {
        let [a, b, c] = mesh.triangle(t)?;
        barycentric(&hit.point, &a, &b, &c)
    });
    let Some(w) = weights else {
        return Some(ca);
    };

    let mix = |a: u8, b: u8, c: u8| -> u8 {
        (a as f64 * w[0] + b as f64 * w[1] + c as f64 * w[2])
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Some(Color::new(
        mix(ca.r, cb.r, cc.r),
        mix(ca.g, cb.g, cc.g),
        mix(ca.b, cb.b, cc.b),
    ))
}
