// Color types and the RGBA → RGB point sampler

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// 8-bit RGB color; the quantizer's point and centroid type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance over the three channels
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Opaque RGBA version of this color
    pub const fn opaque(self) -> Rgba {
        Rgba::new(self.r, self.g, self.b, 255)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// 8-bit RGBA color as handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Distance ignoring alpha
    pub fn distance_squared(self, other: Rgba) -> u32 {
        self.rgb().distance_squared(other.rgb())
    }

    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl From<Rgb> for Rgba {
    fn from(color: Rgb) -> Self {
        color.opaque()
    }
}

/// Flat list of RGB points sampled from a pixel grid (row-major)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorPoints {
    points: Vec<Rgb>,
}

impl ColorPoints {
    /// Flatten a row-major RGBA8 buffer, dropping alpha
    ///
    /// # Errors
    /// `PixelBufferMismatch` if `bytes.len() != width * height * 4`
    pub fn from_rgba8(bytes: &[u8], width: u32, height: u32) -> Result<Self, PaletteError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(PaletteError::PixelBufferMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let points = bytes
            .chunks_exact(4)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Ok(Self { points })
    }

    /// Flatten a decoded image
    pub fn from_image(image: &image::RgbaImage) -> Self {
        let points = image
            .pixels()
            .map(|px| Rgb::new(px.0[0], px.0[1], px.0[2]))
            .collect();
        Self { points }
    }

    pub fn from_points(points: Vec<Rgb>) -> Self {
        Self { points }
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct colors in the set
    pub fn distinct_count(&self) -> usize {
        let mut seen: Vec<Rgb> = self.points.clone();
        seen.sort_unstable_by_key(|c| (c.r, c.g, c.b));
        seen.dedup();
        seen.len()
    }
}

impl AsRef<[Rgb]> for ColorPoints {
    fn as_ref(&self) -> &[Rgb] {
        &self.points
    }
}
