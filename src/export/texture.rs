//! Color atlas packing and PNG encoding.

use crate::color::Color;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use rustc_hash::FxHashMap;
use std::io::Cursor;

/// Smallest atlas edge in pixels.
pub const MIN_ATLAS_SIZE: u32 = 16;

/// Edge of a block model in block units.
const BLOCK_UNITS: f64 = 16.0;

/// 1×1 fully transparent PNG, returned when encoding fails.
pub const FALLBACK_PNG: [u8; 68] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60,
    0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7a, 0x5e, 0xab, 0x3f, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Units for atlas UV rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvUnits {
    /// `0..16` across the atlas, as block models expect.
    Block,
    /// Absolute atlas pixels.
    Pixel,
}

/// Square atlas holding each unique color as a solid cell.
///
/// Color `i` sits in cell `(i % grid_side, i / grid_side)`, each cell
/// `cell_px` pixels wide. Pixels outside every cell are transparent.
#[derive(Debug, Clone)]
pub struct ColorAtlas {
    /// Atlas edge in pixels (power of two, at least [`MIN_ATLAS_SIZE`]).
    pub size: u32,
    /// Cells per atlas row.
    pub grid_side: u32,
    /// Cell edge in pixels.
    pub cell_px: u32,
    /// Unique colors in first-seen order; position is the color index.
    pub colors: Vec<Color>,
    pub image: RgbaImage,
    index: FxHashMap<Color, usize>,
}

impl ColorAtlas {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index assigned to `color`, if it was packed.
    pub fn index_of(&self, color: &Color) -> Option<usize> {
        self.index.get(color).copied()
    }

    /// Color index keyed by the canonical `"r,g,b"` color key.
    pub fn key_index(&self) -> FxHashMap<String, usize> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key(), i))
            .collect()
    }

    /// `[u1, v1, u2, v2]` of the cell holding color `index`.
    pub fn uv(&self, index: usize, units: UvUnits) -> Option<[f64; 4]> {
        if index >= self.colors.len() {
            return None;
        }
        let side = self.grid_side as usize;
        let (x, y) = ((index % side) as f64, (index / side) as f64);
        let cell = self.cell_px as f64;
        let scale = match units {
            UvUnits::Block => BLOCK_UNITS / self.size as f64,
            UvUnits::Pixel => 1.0,
        };
        Some([
            x * cell * scale,
            y * cell * scale,
            (x + 1.0) * cell * scale,
            (y + 1.0) * cell * scale,
        ])
    }

    /// `[u1, v1, u2, v2]` spanning the whole atlas.
    pub fn full_uv(&self, units: UvUnits) -> [f64; 4] {
        let extent = match units {
            UvUnits::Block => BLOCK_UNITS,
            UvUnits::Pixel => self.size as f64,
        };
        [0.0, 0.0, extent, extent]
    }

    /// UV rectangle of every packed color, by index.
    pub fn uv_map(&self, units: UvUnits) -> Vec<[f64; 4]> {
        (0..self.colors.len())
            .filter_map(|i| self.uv(i, units))
            .collect()
    }

    pub fn encode_png(&self) -> Vec<u8> {
        encode_png(&self.image)
    }

    /// PNG of the atlas as a `data:image/png;base64,...` URL.
    pub fn data_url(&self) -> String {
        png_data_url(&self.encode_png())
    }
}

/// Deduplicate `colors` (first occurrence wins) and pack them into an atlas.
///
/// No colors yields a blank white atlas of the minimum size.
pub fn pack(colors: &[Color]) -> ColorAtlas {
    let mut unique = Vec::new();
    let mut index = FxHashMap::default();
    for color in colors {
        index.entry(*color).or_insert_with(|| {
            unique.push(*color);
            unique.len() - 1
        });
    }

    if unique.is_empty() {
        return ColorAtlas {
            size: MIN_ATLAS_SIZE,
            grid_side: 0,
            cell_px: 0,
            colors: unique,
            image: RgbaImage::from_pixel(MIN_ATLAS_SIZE, MIN_ATLAS_SIZE, Rgba([255, 255, 255, 255])),
            index,
        };
    }

    let grid_side = ceil_sqrt(unique.len());
    let size = grid_side.next_power_of_two().max(MIN_ATLAS_SIZE);
    let cell_px = size / grid_side;

    let mut image = RgbaImage::new(size, size);
    for (i, color) in unique.iter().enumerate() {
        let x0 = (i as u32 % grid_side) * cell_px;
        let y0 = (i as u32 / grid_side) * cell_px;
        let px = Rgba(color.to_rgba());
        for y in y0..y0 + cell_px {
            for x in x0..x0 + cell_px {
                image.put_pixel(x, y, px);
            }
        }
    }

    log::debug!(
        "Packed {} colors into a {}x{} atlas ({} px cells)",
        unique.len(),
        size,
        size,
        cell_px
    );

    ColorAtlas {
        size,
        grid_side,
        cell_px,
        colors: unique,
        image,
        index,
    }
}

fn ceil_sqrt(n: usize) -> u32 {
    let mut s = (n as f64).sqrt().ceil() as u32;
    while (s as usize) * (s as usize) < n {
        s += 1;
    }
    while s > 1 && ((s - 1) as usize) * ((s - 1) as usize) >= n {
        s -= 1;
    }
    s.max(1)
}

/// Encode `image` as PNG. Falls back to [`FALLBACK_PNG`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    match image.write_to(&mut buf, ImageFormat::Png) {
        Ok(()) => buf.into_inner(),
        Err(e) => {
            log::warn!("PNG encoding failed, using blank image: {}", e);
            FALLBACK_PNG.to_vec()
        }
    }
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
