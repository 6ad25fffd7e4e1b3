use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::error::{FixtureError, Result};
use crate::render::layout::Region;

/// Colour of the disc drawn when a crest is unavailable.
const PLACEHOLDER_COLOUR: Rgba<u8> = Rgba([49, 55, 61, 255]);

/// A badge scaled for its slot, with the top-left position to paste it at.
#[derive(Debug, Clone)]
pub struct PlacedBadge {
    pub image: RgbaImage,
    pub x: u32,
    pub y: u32,
}

/// Size of a `source_width` x `source_height` image scaled so its longer side spans the slot.
pub fn fit_within(source_width: u32, source_height: u32, slot_width: u32, slot_height: u32) -> (u32, u32) {
    if source_width == 0 || source_height == 0 {
        return (0, 0);
    }
    if source_width >= source_height {
        let height = (source_height as u64 * slot_width as u64 / source_width as u64) as u32;
        (slot_width, height.max(1))
    } else {
        let width = (source_width as u64 * slot_height as u64 / source_height as u64) as u32;
        (width.max(1), slot_height)
    }
}

/// Soften the crest's edges: blur a padded copy and lay the sharp original back on top.
pub fn feather(image: &RgbaImage, blur_size: u32) -> RgbaImage {
    if blur_size == 0 {
        return image.clone();
    }
    let margin = blur_size * 10;
    let mut padded = RgbaImage::new(image.width() + 2 * margin, image.height() + 2 * margin);
    imageops::overlay(&mut padded, image, margin as i64, margin as i64);

    let mut blurred = imageops::blur(&padded, blur_size as f32);
    imageops::overlay(&mut blurred, &padded, 0, 0);
    blurred
}

/// Bounding box of every pixel with non-zero alpha, or `None` for a fully transparent image.
pub fn opaque_bounds(image: &RgbaImage) -> Option<Region> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    (min_x != u32::MAX).then(|| Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Decode, feather, crop, scale and centre a crest inside `slot`.
pub fn place_badge(bytes: &[u8], url: &str, slot: Region, blur_size: u32) -> Result<PlacedBadge> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| FixtureError::badge(url, e))?
        .to_rgba8();
    let feathered = feather(&decoded, blur_size);
    let bounds = opaque_bounds(&feathered).ok_or_else(|| FixtureError::badge(url, "crest is fully transparent"))?;
    let cropped = imageops::crop_imm(&feathered, bounds.x, bounds.y, bounds.width, bounds.height).to_image();

    let (width, height) = fit_within(cropped.width(), cropped.height(), slot.width, slot.height);
    let scaled = imageops::resize(&cropped, width, height, FilterType::Lanczos3);
    Ok(centred(scaled, slot))
}

/// A plain disc filling the slot, used when the crest cannot be fetched or decoded.
pub fn placeholder(slot: Region) -> PlacedBadge {
    let side = slot.width.min(slot.height).max(1);
    let mut image = RgbaImage::new(side, side);
    let radius = (side / 2) as i32;
    draw_filled_circle_mut(&mut image, (radius, radius), radius.saturating_sub(1).max(0), PLACEHOLDER_COLOUR);
    centred(image, slot)
}

fn centred(image: RgbaImage, slot: Region) -> PlacedBadge {
    let x = slot.x + slot.width.saturating_sub(image.width()) / 2;
    let y = slot.y + slot.height.saturating_sub(image.height()) / 2;
    PlacedBadge { image, x, y }
}
