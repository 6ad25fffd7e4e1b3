use serde::{Deserialize, Serialize};

/// Vertical inset of the header text inside the header band.
const HEADER_TEXT_INSET: u32 = 5;

/// Scalars the card geometry is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardLayout {
    pub header_height: u32,
    pub badge_size: u32,
    pub pad: u32,
    pub inner_gap: u32,
    pub form_outline: u32,
    /// Text is drawn this many times larger and downscaled onto the card. 1 disables it.
    pub supersample: u32,
    /// Gaussian feathering radius around badges. 0 disables it.
    pub blur_size: u32,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            header_height: 50,
            badge_size: 200,
            pad: 10,
            inner_gap: 60,
            form_outline: 2,
            supersample: 2,
            blur_size: 3,
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Shrink by `by` pixels on every side, never below zero size.
    pub fn inset(&self, by: u32) -> Self {
        Self {
            x: self.x + by.min(self.width / 2),
            y: self.y + by.min(self.height / 2),
            width: self.width.saturating_sub(2 * by),
            height: self.height.saturating_sub(2 * by),
        }
    }

    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Side length of one form cell; zero when no form row is drawn.
pub fn form_cell_size(badge_size: u32, form_count: usize) -> u32 {
    if form_count == 0 {
        0
    } else {
        badge_size / form_count as u32
    }
}

/// Canvas (width, height) for a card with `form_count` form cells per team.
pub fn canvas_size(layout: &CardLayout, form_count: usize) -> (u32, u32) {
    let cell = form_cell_size(layout.badge_size, form_count);
    (
        4 * layout.pad + 2 * layout.badge_size + layout.inner_gap,
        4 * layout.pad + layout.header_height + layout.badge_size + cell,
    )
}

/// Every region of a card, derived from a [`CardLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardGeometry {
    pub width: u32,
    pub height: u32,
    pub header: Region,
    pub header_text: Region,
    pub home_badge: Region,
    pub away_badge: Region,
    pub vs: Region,
    pub form_cell: u32,
    pub form_count: usize,
}

impl CardGeometry {
    pub fn new(layout: &CardLayout, form_count: usize) -> Self {
        let (width, height) = canvas_size(layout, form_count);
        let pad = layout.pad;
        let size = layout.badge_size;

        let header = Region::new(pad, pad, width - 2 * pad, layout.header_height);
        let header_text = Region {
            x: header.x,
            y: header.y + HEADER_TEXT_INSET.min(header.height / 2),
            width: header.width,
            height: header.height.saturating_sub(2 * HEADER_TEXT_INSET),
        };

        let home_badge = Region::new(pad, header.bottom() + pad, size, size);
        let away_badge = Region::new(home_badge.right() + 2 * pad + layout.inner_gap, home_badge.y, size, size);
        let vs = Region::new(
            home_badge.right() + pad,
            home_badge.y,
            away_badge.x - pad - (home_badge.right() + pad),
            size,
        );

        Self {
            width,
            height,
            header,
            header_text,
            home_badge,
            away_badge,
            vs,
            form_cell: form_cell_size(size, form_count),
            form_count,
        }
    }

    /// Cells of the form row under `badge`, left to right, at most `form_count` of them.
    pub fn form_cells(&self, badge: Region, symbols: usize) -> Vec<Region> {
        if self.form_cell == 0 {
            return Vec::new();
        }
        let y = badge.bottom() + (self.home_badge.y - self.header.bottom());
        (0..symbols.min(self.form_count))
            .map(|i| Region::new(badge.x + i as u32 * self.form_cell, y, self.form_cell, self.form_cell))
            .collect()
    }
}
