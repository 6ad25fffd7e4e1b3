use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FixtureError, Result};
use crate::render::layout::Region;

/// Upper bound for the exponential phase of [`fit_text_size`]; only reached by text with no extent.
const MAX_FONT_SIZE: u32 = 4096;

/// Measures and rasterises text at an integer pixel size.
pub trait TextPainter {
    /// (width, height) in pixels of `text` drawn at `size`. Lines are separated by `\n`.
    fn measure(&self, text: &str, size: u32) -> (u32, u32);

    /// Draw `text` with its bounding box's top-left corner at (`x`, `y`), lines centred on each other.
    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, size: u32, colour: Rgba<u8>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl HAlign {
    fn factor(self) -> f32 {
        match self {
            HAlign::Left => 0.0,
            HAlign::Center => 0.5,
            HAlign::Right => 1.0,
        }
    }
}

impl VAlign {
    fn factor(self) -> f32 {
        match self {
            VAlign::Top => 0.0,
            VAlign::Center => 0.5,
            VAlign::Bottom => 1.0,
        }
    }
}

/// Largest integer size at which `text` fits within `max_width` x `max_height`.
///
/// Doubles upward from `max_height` until the text no longer fits (or halves downward
/// when even that overflows), then binary searches between the last fitting and the
/// first failing size. Returns 1 when nothing fits.
pub fn fit_text_size<P: TextPainter + ?Sized>(painter: &P, text: &str, max_width: u32, max_height: u32) -> u32 {
    let fits = |size: u32| {
        let (w, h) = painter.measure(text, size);
        w <= max_width && h <= max_height
    };

    if max_width == 0 || max_height == 0 || !fits(1) {
        debug!(text, max_width, max_height, "Text does not fit at any size; using 1");
        return 1;
    }

    let start = max_height.clamp(1, MAX_FONT_SIZE);
    let (mut lower, mut upper) = if fits(start) {
        let mut lower = start;
        let mut upper = start.saturating_mul(2).min(MAX_FONT_SIZE);
        while fits(upper) {
            lower = upper;
            if upper >= MAX_FONT_SIZE {
                return lower;
            }
            upper = upper.saturating_mul(2).min(MAX_FONT_SIZE);
        }
        (lower, upper)
    } else {
        let mut upper = start;
        let mut probe = start / 2;
        while probe > 1 && !fits(probe) {
            upper = probe;
            probe /= 2;
        }
        (probe.max(1), upper)
    };

    while upper - lower > 1 {
        let mid = lower + (upper - lower) / 2;
        if fits(mid) {
            lower = mid;
        } else {
            upper = mid;
        }
    }
    lower
}

/// Offset of a `text_dim` extent inside a `box_dim` extent for the given alignment factor.
fn aligned_offset(box_dim: u32, text_dim: u32, factor: f32) -> i32 {
    ((box_dim as f32 - text_dim as f32) * factor).round() as i32
}

/// Size `text` to fill `region` and draw it aligned inside it.
pub fn draw_fitted<P: TextPainter + ?Sized>(
    canvas: &mut RgbaImage,
    painter: &P,
    text: &str,
    region: Region,
    h_align: HAlign,
    v_align: VAlign,
    colour: Rgba<u8>,
) {
    let size = fit_text_size(painter, text, region.width, region.height);
    let (w, h) = painter.measure(text, size);
    let x = region.x as i32 + aligned_offset(region.width, w, h_align.factor());
    let y = region.y as i32 + aligned_offset(region.height, h, v_align.factor());
    painter.draw(canvas, text, x, y, size, colour);
}

/// [`TextPainter`] backed by a TrueType/OpenType font.
pub struct FontPainter {
    font: FontVec,
}

impl FontPainter {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| FixtureError::Font(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| FixtureError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    fn line_height(&self, scale: PxScale) -> u32 {
        self.font.as_scaled(scale).height().ceil() as u32
    }

    /// Coverage mask of the whole text block, each line centred on the widest.
    fn coverage(&self, text: &str, size: u32) -> GrayImage {
        let scale = PxScale::from(size as f32);
        let line_height = self.line_height(scale);
        let (width, height) = self.measure(text, size);
        let mut mask = GrayImage::new(width, height);
        for (row, line) in text.split('\n').enumerate() {
            let (line_width, _) = text_size(scale, &self.font, line);
            let left = (width.saturating_sub(line_width) / 2) as i32;
            let top = (row as u32 * line_height) as i32;
            draw_text_mut(&mut mask, Luma([255]), left, top, scale, &self.font, line);
        }
        mask
    }
}

impl TextPainter for FontPainter {
    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        let scale = PxScale::from(size as f32);
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| text_size(scale, &self.font, line).0)
            .max()
            .unwrap_or(0);
        (width, self.line_height(scale) * lines.len() as u32)
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, size: u32, colour: Rgba<u8>) {
        let mask = self.coverage(text, size);
        paint_mask(canvas, &mask, x, y, colour);
    }
}

/// Blend `colour` onto `canvas` through `mask`, whose top-left corner lands at (`x`, `y`).
/// Nothing outside the mask's box is touched.
fn paint_mask(canvas: &mut RgbaImage, mask: &GrayImage, x: i32, y: i32, colour: Rgba<u8>) {
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let (px, py) = (x + mx as i32, y + my as i32);
        if coverage[0] == 0 || px < 0 || py < 0 || px >= canvas.width() as i32 || py >= canvas.height() as i32 {
            continue;
        }
        let mut src = colour;
        src[3] = (colour[3] as u16 * coverage[0] as u16 / 255) as u8;
        canvas.get_pixel_mut(px as u32, py as u32).blend(&src);
    }
}
