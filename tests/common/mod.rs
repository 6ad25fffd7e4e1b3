#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use chrono::NaiveDate;
use football_fixtures_lambda_rust::FixtureError;
use football_fixtures_lambda_rust::api_football::{BadgeSource, FixtureSource, parse_fixtures};
use football_fixtures_lambda_rust::model::Fixture;
use football_fixtures_lambda_rust::render::TextPainter;
use image::{ImageFormat, Rgba, RgbaImage};

pub const NEXT_ARSENAL: &str = include_str!("../next_fixture_arsenal.json");
pub const LAST_ARSENAL: &str = include_str!("../last_fixtures_arsenal.json");
pub const COMPETITION_TODAY: &str = include_str!("../competition_fixtures_today.json");
pub const EMPTY: &str = include_str!("../empty_fixtures.json");

pub const ARSENAL: i64 = 42;
pub const MAN_CITY: i64 = 50;
pub const PREMIER_LEAGUE: i64 = 2790;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 10, 17).unwrap()
}

pub fn fixtures(body: &str) -> Vec<Fixture> {
    parse_fixtures(body).expect("sample parses")
}

/// In-memory stand-in for the api-football client.
#[derive(Default)]
pub struct FakeApi {
    pub next: HashMap<i64, Vec<Fixture>>,
    pub last: HashMap<i64, Vec<Fixture>>,
    pub competitions: HashMap<i64, Vec<Fixture>>,
    pub failing_teams: HashSet<i64>,
    pub failing_competitions: HashSet<i64>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next(mut self, team_id: i64, body: &str) -> Self {
        self.next.insert(team_id, fixtures(body));
        self
    }

    pub fn with_last(mut self, team_id: i64, body: &str) -> Self {
        self.last.insert(team_id, fixtures(body));
        self
    }

    pub fn with_competition(mut self, competition_id: i64, body: &str) -> Self {
        self.competitions.insert(competition_id, fixtures(body));
        self
    }

    pub fn failing_team(mut self, team_id: i64) -> Self {
        self.failing_teams.insert(team_id);
        self
    }

    fn fail(&self, what: String) -> FixtureError {
        FixtureError::FetchFailed { url: what, reason: "simulated outage".into() }
    }
}

impl FixtureSource for FakeApi {
    fn next_team_fixture(&self, team_id: i64) -> football_fixtures_lambda_rust::Result<Option<Fixture>> {
        self.requests.borrow_mut().push(format!("next/{team_id}"));
        if self.failing_teams.contains(&team_id) {
            return Err(self.fail(format!("next/{team_id}")));
        }
        Ok(self.next.get(&team_id).and_then(|f| f.first().cloned()))
    }

    fn last_team_fixtures(&self, team_id: i64, count: usize) -> football_fixtures_lambda_rust::Result<Vec<Fixture>> {
        self.requests.borrow_mut().push(format!("last/{team_id}/{count}"));
        if self.failing_teams.contains(&team_id) {
            return Err(self.fail(format!("last/{team_id}")));
        }
        Ok(self.last.get(&team_id).cloned().unwrap_or_default())
    }

    fn competition_fixtures(&self, competition_id: i64, date: NaiveDate) -> football_fixtures_lambda_rust::Result<Vec<Fixture>> {
        self.requests.borrow_mut().push(format!("league/{competition_id}/{date}"));
        if self.failing_competitions.contains(&competition_id) {
            return Err(self.fail(format!("league/{competition_id}")));
        }
        Ok(self.competitions.get(&competition_id).cloned().unwrap_or_default())
    }
}

impl BadgeSource for FakeApi {
    fn badge_bytes(&self, url: &str) -> football_fixtures_lambda_rust::Result<Vec<u8>> {
        self.requests.borrow_mut().push(format!("badge {url}"));
        if url.contains("broken") {
            return Err(FixtureError::BadgeFetchFailed { url: url.into(), reason: "404".into() });
        }
        Ok(crest_png(64, 48, Rgba([200, 16, 46, 255])))
    }
}

/// An opaque PNG of the given size and colour.
pub fn crest_png(width: u32, height: u32, colour: Rgba<u8>) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, colour);
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

/// Fixed-advance painter that draws each text block as a solid rectangle.
pub struct BlockPainter;

impl TextPainter for BlockPainter {
    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        (longest * size / 2, size * lines.len() as u32)
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, size: u32, colour: Rgba<u8>) {
        let (w, h) = self.measure(text, size);
        for py in y.max(0)..(y + h as i32).min(canvas.height() as i32) {
            for px in x.max(0)..(x + w as i32).min(canvas.width() as i32) {
                canvas.put_pixel(px as u32, py as u32, colour);
            }
        }
    }
}
