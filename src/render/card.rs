use chrono::{Datelike, Weekday};
use chrono_tz::Tz;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{info, instrument, warn};

use crate::api_football::BadgeSource;
use crate::model::{Fixture, FormSymbol, Team};
use crate::render::badge::{self, PlacedBadge};
use crate::render::layout::{CardGeometry, CardLayout, Region};
use crate::render::text::{HAlign, TextPainter, VAlign, draw_fitted};

const HEADER_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FORM_TEXT: Rgba<u8> = Rgba([255, 255, 255, 100]);
const VS_TEXT: Rgba<u8> = Rgba([255, 255, 255, 80]);

/// Header band colour for a kick-off on `day`.
pub fn header_colour(day: Weekday) -> Rgba<u8> {
    match day {
        Weekday::Mon => Rgba([82, 50, 73, 255]),
        Weekday::Tue => Rgba([44, 62, 80, 255]),
        Weekday::Wed => Rgba([22, 96, 86, 255]),
        Weekday::Thu => Rgba([121, 85, 32, 255]),
        Weekday::Fri => Rgba([39, 70, 130, 255]),
        Weekday::Sat => Rgba([128, 35, 45, 255]),
        Weekday::Sun => Rgba([60, 90, 40, 255]),
    }
}

/// Composes fixture cards from a font, a crest source and layout scalars.
pub struct CardRenderer<'a, P: TextPainter + ?Sized, B: BadgeSource + ?Sized> {
    painter: &'a P,
    badges: &'a B,
    layout: CardLayout,
    tz: Tz,
}

impl<'a, P: TextPainter + ?Sized, B: BadgeSource + ?Sized> CardRenderer<'a, P, B> {
    pub fn new(painter: &'a P, badges: &'a B, layout: CardLayout, tz: Tz) -> Self {
        Self { painter, badges, layout, tz }
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Header text: competition, then venue and local kick-off time.
    pub fn header_text(&self, fixture: &Fixture) -> String {
        let kickoff = fixture.local_start(&self.tz).format("%H:%M");
        match &fixture.venue {
            Some(venue) => format!("{}\n{} @ {}", fixture.competition_name, venue, kickoff),
            None => format!("{}\n{}", fixture.competition_name, kickoff),
        }
    }

    /// Render one card. `form_count` sets the width of the form row; 0 omits it.
    /// Each form slice is drawn in the order given.
    #[instrument(level = "info", skip_all, fields(home = %fixture.home_team.name, away = %fixture.away_team.name, form_count = form_count))]
    pub fn render_card(
        &self,
        fixture: &Fixture,
        home_form: &[FormSymbol],
        away_form: &[FormSymbol],
        form_count: usize,
    ) -> RgbaImage {
        let geometry = CardGeometry::new(&self.layout, form_count);
        let factor = self.layout.supersample.max(1);
        let mut shapes = RgbaImage::new(geometry.width, geometry.height);
        let mut text = RgbaImage::new(geometry.width * factor, geometry.height * factor);

        // Header
        let weekday = fixture.local_start(&self.tz).weekday();
        fill(&mut shapes, geometry.header, header_colour(weekday));
        self.text(&mut text, &self.header_text(fixture), geometry.header_text, HEADER_TEXT);

        // Badges
        for (team, slot) in [(&fixture.home_team, geometry.home_badge), (&fixture.away_team, geometry.away_badge)] {
            let placed = self.badge_for(team, slot);
            imageops::overlay(&mut shapes, &placed.image, placed.x as i64, placed.y as i64);
        }

        // Form rows
        for (form, slot) in [(home_form, geometry.home_badge), (away_form, geometry.away_badge)] {
            for (cell, symbol) in geometry.form_cells(slot, form.len()).into_iter().zip(form) {
                let inner = cell.inset(self.layout.form_outline);
                fill(&mut shapes, inner, Rgba(symbol.colour()));
                self.text(&mut text, &symbol.letter().to_string(), inner, FORM_TEXT);
            }
        }

        self.text(&mut text, "VS", geometry.vs, VS_TEXT);

        let text = if factor > 1 { downsample(text, geometry.width, geometry.height) } else { text };
        imageops::overlay(&mut shapes, &text, 0, 0);
        shapes
    }

    fn text(&self, layer: &mut RgbaImage, content: &str, region: Region, colour: Rgba<u8>) {
        let factor = self.layout.supersample.max(1);
        draw_fitted(layer, self.painter, content, region.scaled(factor), HAlign::Center, VAlign::Center, colour);
    }

    fn badge_for(&self, team: &Team, slot: Region) -> PlacedBadge {
        let Some(url) = team.badge_url.as_deref() else {
            info!(team = %team.name, "Team has no badge URL; drawing placeholder");
            return badge::placeholder(slot);
        };
        let placed = self
            .badges
            .badge_bytes(url)
            .and_then(|bytes| badge::place_badge(&bytes, url, slot, self.layout.blur_size));
        match placed {
            Ok(placed) => placed,
            Err(e) => {
                warn!(error = %e, team = %team.name, "Badge unavailable; drawing placeholder");
                badge::placeholder(slot)
            }
        }
    }
}

/// Shrink a straight-alpha layer. Colour is premultiplied for the resize so transparent
/// pixels do not bleed their black RGB into glyph edges.
fn downsample(mut layer: RgbaImage, width: u32, height: u32) -> RgbaImage {
    for pixel in layer.pixels_mut() {
        let alpha = pixel[3] as u16;
        for c in 0..3 {
            pixel[c] = (pixel[c] as u16 * alpha / 255) as u8;
        }
    }
    let mut shrunk = imageops::resize(&layer, width, height, FilterType::Triangle);
    for pixel in shrunk.pixels_mut() {
        let alpha = pixel[3] as u16;
        if alpha == 0 {
            continue;
        }
        for c in 0..3 {
            pixel[c] = (pixel[c] as u16 * 255 / alpha).min(255) as u8;
        }
    }
    shrunk
}

fn fill(canvas: &mut RgbaImage, region: Region, colour: Rgba<u8>) {
    if region.width == 0 || region.height == 0 {
        return;
    }
    let rect = Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height);
    draw_filled_rect_mut(canvas, rect, colour);
}
