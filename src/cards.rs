use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::aggregator::{ActiveFixtures, TrackingSet};
use crate::api_football::{BadgeSource, FixtureSource};
use crate::error::Result;
use crate::form::{DEFAULT_MATCH_COUNT, FormOrder, compute_form};
use crate::model::Fixture;
use crate::render::{CardRenderer, TextPainter};

/// How many form cells each card gets and in which order they are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPolicy {
    /// Form window for fixtures involving a tracked team.
    pub team_form_count: usize,
    /// Form window for fixtures picked up only through a tracked competition.
    pub competition_form_count: usize,
    /// Cap on the form window of a text post line.
    pub text_form_count: usize,
    pub order: FormOrder,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            team_form_count: 10,
            competition_form_count: 0,
            text_form_count: DEFAULT_MATCH_COUNT,
            order: FormOrder::default(),
        }
    }
}

impl FormPolicy {
    pub fn form_count_for(&self, fixture: &Fixture, tracking: &TrackingSet) -> usize {
        if tracking.is_tracked_team(fixture.home_team.id) || tracking.is_tracked_team(fixture.away_team.id) {
            self.team_form_count
        } else {
            self.competition_form_count
        }
    }

    /// Form window for a text line: the card's window, capped at `text_form_count`.
    pub fn text_form_count_for(&self, fixture: &Fixture, tracking: &TrackingSet) -> usize {
        self.form_count_for(fixture, tracking).min(self.text_form_count)
    }
}

/// A finished card and the fixture it shows.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub fixture: Fixture,
    pub image: RgbaImage,
}

impl RenderedCard {
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_vs_{}.png",
            self.fixture.start_time.format("%Y%m%d%H%M"),
            self.fixture.home_team.id,
            self.fixture.away_team.id
        )
    }
}

/// Lazily renders the active fixtures, one card per pull, draining them as it goes.
///
/// A fixture whose form cannot be fetched yields an `Err` item; the next pull carries on
/// with the following fixture. The stream is finite and cannot be restarted.
pub struct CardStream<'a, S: ?Sized, P: TextPainter + ?Sized, B: BadgeSource + ?Sized> {
    fixtures: ActiveFixtures,
    tracking: &'a TrackingSet,
    source: &'a S,
    renderer: CardRenderer<'a, P, B>,
    policy: FormPolicy,
}

impl<'a, S, P, B> CardStream<'a, S, P, B>
where
    S: FixtureSource + ?Sized,
    P: TextPainter + ?Sized,
    B: BadgeSource + ?Sized,
{
    pub fn new(
        fixtures: ActiveFixtures,
        tracking: &'a TrackingSet,
        source: &'a S,
        renderer: CardRenderer<'a, P, B>,
        policy: FormPolicy,
    ) -> Self {
        Self { fixtures, tracking, source, renderer, policy }
    }

    /// Fixtures not yet rendered.
    pub fn remaining(&self) -> usize {
        self.fixtures.len()
    }

    #[instrument(level = "info", skip_all, fields(home = %fixture.home_team.name, away = %fixture.away_team.name))]
    fn render(&self, fixture: Fixture) -> Result<RenderedCard> {
        let form_count = self.policy.form_count_for(&fixture, self.tracking);
        let home_form = compute_form(self.source, &fixture.home_team, form_count, self.policy.order)?;
        let away_form = compute_form(self.source, &fixture.away_team, form_count, self.policy.order)?;
        let image = self.renderer.render_card(&fixture, &home_form, &away_form, form_count);
        info!(width = image.width(), height = image.height(), "Rendered card");
        Ok(RenderedCard { fixture, image })
    }
}

impl<'a, S, P, B> Iterator for CardStream<'a, S, P, B>
where
    S: FixtureSource + ?Sized,
    P: TextPainter + ?Sized,
    B: BadgeSource + ?Sized,
{
    type Item = Result<RenderedCard>;

    fn next(&mut self) -> Option<Self::Item> {
        let fixture = self.fixtures.pop_front()?;
        Some(self.render(fixture))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.fixtures.len(), Some(self.fixtures.len()))
    }
}
