use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color. No alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert normalized float channels (0.0-1.0) to 8-bit, rounding to nearest.
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Canonical `"r,g,b"` key used for deduplication.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Component-wise mean, rounded to nearest. White for an empty slice.
pub fn average_colors(colors: &[Color]) -> Color {
    match colors {
        [] => Color::WHITE,
        [single] => *single,
        _ => {
            let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
            for c in colors {
                r += c.r as u32;
                g += c.g as u32;
                b += c.b as u32;
            }
            let n = colors.len() as f64;
            Color::new(
                (r as f64 / n).round() as u8,
                (g as f64 / n).round() as u8,
                (b as f64 / n).round() as u8,
            )
        }
    }
}

/// Most frequent color; ties go to the color seen first. White for an empty slice.
pub fn dominant_color(colors: &[Color]) -> Color {
    let mut counts: FxHashMap<Color, usize> = FxHashMap::default();
    for c in colors {
        *counts.entry(*c).or_insert(0) += 1;
    }

    let mut best: Option<(Color, usize)> = None;
    for c in colors {
        let n = counts[c];
        match best {
            Some((_, best_n)) if best_n >= n => {}
            _ => best = Some((*c, n)),
        }
    }
    best.map(|(c, _)| c).unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_key() {
        assert_eq!(Color::new(255, 0, 12).key(), "255,0,12");
    }

    #[test]
    fn test_from_unit_rgb_rounds() {
        assert_eq!(Color::from_unit_rgb(1.0, 0.5, 0.0), Color::new(255, 128, 0));
        assert_eq!(Color::from_unit_rgb(2.0, -1.0, f64::NAN), Color::new(255, 0, 0));
    }

    #[test]
    fn test_average_colors() {
        assert_eq!(average_colors(&[]), Color::WHITE);
        assert_eq!(
            average_colors(&[Color::new(255, 0, 0), Color::new(0, 0, 255)]),
            Color::new(128, 0, 128)
        );
        assert_eq!(
            average_colors(&[Color::new(10, 20, 30), Color::new(11, 21, 31), Color::new(11, 21, 31)]),
            Color::new(11, 21, 31)
        );
    }

    #[test]
    fn test_dominant_color_tie_goes_to_first() {
        let red = Color::new(255, 0, 0);
        let green = Color::new(0, 255, 0);
        assert_eq!(dominant_color(&[green, red, red, green]), green);
        assert_eq!(dominant_color(&[green, red, red]), red);
        assert_eq!(dominant_color(&[]), Color::WHITE);
    }
}
