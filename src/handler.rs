use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::aggregator::{DedupRule, TrackingSet};
use crate::api_football::{ApiFootball, BadgeSource, FixtureSource};
use crate::cards::{CardStream, FormPolicy};
use crate::discord::Discord;
use crate::error::{FixtureError, Result};
use crate::render::{CardLayout, CardRenderer, FontPainter, TextPainter};
use crate::summary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    Production,
}

/// What one cycle posts: one image per fixture, or a single text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    #[default]
    Cards,
    Text,
}

fn default_timezone() -> String {
    "Europe/London".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub mode: Mode,
    pub discord_hook_url: String,
    pub test_discord_hook_url: String,
    pub api_key: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub font_path: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub tracked_team_ids: Vec<i64>,
    #[serde(default)]
    pub tracked_competition_ids: Vec<i64>,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default = "default_true")]
    pub today_only: bool,
    #[serde(default)]
    pub dedup: DedupRule,
    #[serde(default)]
    pub form: FormPolicy,
    #[serde(default)]
    pub layout: CardLayout,
    /// Discord emoji shown instead of the team name in text posts, keyed by team id.
    #[serde(default)]
    pub badge_emojis: HashMap<i64, String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Request {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| FixtureError::Config(format!("unknown timezone {:?}: {}", self.timezone, e)))
    }

    pub fn tracking_set(&self) -> TrackingSet {
        let mut tracking = TrackingSet::new();
        tracking.track_teams(self.tracked_team_ids.iter().copied());
        tracking.track_competitions(self.tracked_competition_ids.iter().copied());
        tracking
    }

    pub fn api_client(&self) -> ApiFootball {
        ApiFootball::new(
            self.api_key.clone(),
            self.api_base_url.clone(),
            Duration::from_secs(self.request_timeout_secs.max(1)),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

/// Something the delivery collaborator should post.
#[derive(Debug, Clone)]
pub enum Post {
    Text(String),
    Card { file_name: String, png: Vec<u8> },
}

/// Outcome counts of one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub posted: usize,
    pub failed: usize,
}

impl CycleReport {
    pub fn summary(&self, presentation: Presentation) -> String {
        let noun = match presentation {
            Presentation::Cards => "cards",
            Presentation::Text => "messages",
        };
        if self.posted == 0 && self.failed == 0 {
            "No fixtures to post (skipped)".to_string()
        } else {
            format!("Posted {} {} ({} failed)", self.posted, noun, self.failed)
        }
    }
}

/// Fetch, aggregate and render the fixtures for `today`, handing each post to `deliver`.
///
/// Per-fixture failures (form fetch, encoding, delivery) are logged, counted and skipped.
#[instrument(level = "info", skip_all, fields(today = %today, presentation = ?request.presentation))]
pub fn run_cycle<S, P, F>(
    request: &Request,
    source: &S,
    painter: Option<&P>,
    today: NaiveDate,
    mut deliver: F,
) -> Result<CycleReport>
where
    S: FixtureSource + BadgeSource + ?Sized,
    P: TextPainter + ?Sized,
    F: FnMut(Post) -> Result<()>,
{
    let tz = request.timezone()?;
    let tracking = request.tracking_set();
    let active = tracking.aggregate(source, today, &tz, request.today_only, request.dedup);
    let mut report = CycleReport::default();

    match request.presentation {
        Presentation::Text => {
            let lines = summary::describe_all(active, source, &tz, request.form, &tracking, &request.badge_emojis);
            if let Some(message) = summary::daily_message(&lines) {
                info!(message = %message, "Prepared fixtures message");
                match deliver(Post::Text(message)) {
                    Ok(()) => report.posted += 1,
                    Err(e) => {
                        error!(error = %e, "Failed to deliver fixtures message");
                        report.failed += 1;
                    }
                }
            }
        }
        Presentation::Cards => {
            if active.is_empty() {
                return Ok(report);
            }
            let painter = painter.ok_or_else(|| FixtureError::Config("font_path is required for cards".into()))?;
            let renderer = CardRenderer::new(painter, source, request.layout, tz);
            for card in CardStream::new(active, &tracking, source, renderer, request.form) {
                let post = card.and_then(|card| {
                    Ok(Post::Card { file_name: card.file_name(), png: card.to_png()? })
                });
                match post.and_then(&mut deliver) {
                    Ok(()) => report.posted += 1,
                    Err(e) => {
                        error!(error = %e, "Skipping card");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    info!(posted = report.posted, failed = report.failed, "Cycle finished");
    Ok(report)
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> std::result::Result<Response, Error> {
    let payload = event.payload; // Derived from the Lambda event

    // Select destination based on request mode
    let message_destination = match payload.mode {
        Mode::Test => payload.test_discord_hook_url.clone(),
        Mode::Production => payload.discord_hook_url.clone(),
    };
    let discord = Discord::new(message_destination);

    // ureq is blocking; the whole cycle runs on the blocking pool and owns its inputs.
    let report = tokio::task::spawn_blocking(move || -> Result<String> {
        let tz = payload.timezone()?;
        let today = chrono::Utc::now().with_timezone(&tz).date_naive();
        let api = payload.api_client();
        let painter = match (&payload.presentation, &payload.font_path) {
            (Presentation::Cards, Some(path)) => Some(FontPainter::from_file(path)?),
            _ => None,
        };
        let report = run_cycle(&payload, &api, painter.as_ref(), today, |post| match post {
            Post::Text(message) => discord.post(&message),
            Post::Card { file_name, png } => discord.post_with_attachment("", &file_name, &png),
        })?;
        Ok(report.summary(payload.presentation))
    })
    .await?;

    match report {
        Ok(message) => Ok(Response { message }),
        Err(e) => {
            error!(error = %e, "Fixture cycle failed");
            Err(e.into())
        }
    }
}
