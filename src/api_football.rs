use std::time::Duration;

use chrono::NaiveDate;
use tracing::{error, info, info_span, instrument};

use crate::error::{FixtureError, Result};
use crate::model::Fixture;
use crate::model::record::FixturesDocument;

pub const DEFAULT_BASE_URL: &str = "https://api-football-v1.p.rapidapi.com/v2";
const RAPIDAPI_HOST: &str = "api-football-v1.p.rapidapi.com";

/// Fixture lookups the aggregator and form calculator depend on.
pub trait FixtureSource {
    /// The team's next scheduled fixture, or `None` when the API has nothing queued.
    fn next_team_fixture(&self, team_id: i64) -> Result<Option<Fixture>>;

    /// The team's last `count` fixtures in whatever order the API returns them.
    fn last_team_fixtures(&self, team_id: i64, count: usize) -> Result<Vec<Fixture>>;

    /// Every fixture of a competition scheduled on `date`.
    fn competition_fixtures(&self, competition_id: i64, date: NaiveDate) -> Result<Vec<Fixture>>;
}

/// Raw crest bytes by URL.
pub trait BadgeSource {
    fn badge_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking client for the api-football v2 endpoints on RapidAPI.
#[derive(Debug, Clone)]
pub struct ApiFootball {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl ApiFootball {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
        }
    }

    #[instrument(level = "info", skip(self))]
    fn get_fixtures(&self, path: &str) -> Result<Vec<Fixture>> {
        let url = format!("{}{}", self.base_url, path);
        let response_result = {
            let _span = info_span!("api_football_fetch", url = %url).entered();
            self.agent
                .get(&url)
                .header("x-rapidapi-key", &self.api_key)
                .header("x-rapidapi-host", RAPIDAPI_HOST)
                .call()
        };
        let response = response_result.map_err(|e| {
            error!(error = %e, url = %url, "Fixture request failed");
            FixtureError::fetch(&url, e)
        })?;
        let body = response.into_body().read_to_string().map_err(|e| {
            error!(error = %e, url = %url, "Failed to read fixture response body");
            FixtureError::fetch(&url, e)
        })?;
        let fixtures = parse_fixtures(&body).map_err(|e| match e {
            FixtureError::FetchFailed { reason, .. } => FixtureError::FetchFailed { url: url.clone(), reason },
            other => other,
        })?;
        info!(count = fixtures.len(), "Fetched fixtures");
        Ok(fixtures)
    }
}

impl FixtureSource for ApiFootball {
    fn next_team_fixture(&self, team_id: i64) -> Result<Option<Fixture>> {
        let fixtures = self.get_fixtures(&format!("/fixtures/team/{}/next/1", team_id))?;
        Ok(fixtures.into_iter().next())
    }

    fn last_team_fixtures(&self, team_id: i64, count: usize) -> Result<Vec<Fixture>> {
        self.get_fixtures(&format!("/fixtures/team/{}/last/{}", team_id, count))
    }

    fn competition_fixtures(&self, competition_id: i64, date: NaiveDate) -> Result<Vec<Fixture>> {
        self.get_fixtures(&format!("/fixtures/league/{}/{}", competition_id, date.format("%Y-%m-%d")))
    }
}

impl BadgeSource for ApiFootball {
    #[instrument(level = "info", skip(self))]
    fn badge_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.agent.get(url).call().map_err(|e| FixtureError::badge(url, e))?;
        response
            .into_body()
            .read_to_vec()
            .map_err(|e| FixtureError::badge(url, e))
    }
}

/// Parse a `{api: {fixtures: [...]}}` body into fixtures. This is the only place raw JSON is inspected.
#[instrument(level = "info", skip(body), fields(bytes = body.len()))]
pub fn parse_fixtures(body: &str) -> Result<Vec<Fixture>> {
    let doc: FixturesDocument = serde_json::from_str(body)
        .map_err(|e| FixtureError::fetch("response body", format!("malformed fixtures document: {}", e)))?;
    doc.api.fixtures.into_iter().map(Fixture::from_record).collect()
}
