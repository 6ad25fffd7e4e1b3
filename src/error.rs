use thiserror::Error;

/// Failures raised while fetching, classifying or rendering fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Network/API error or a body that did not parse. Skip the affected team, competition or fixture.
    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// A crest could not be retrieved or decoded. Recovered by drawing a placeholder.
    #[error("badge fetch failed for {url}: {reason}")]
    BadgeFetchFailed { url: String, reason: String },

    /// A result was requested for a team that did not play in the fixture.
    #[error("team {team_id} is not part of fixture {home_id} vs {away_id}")]
    InvalidTeamAssociation { team_id: i64, home_id: i64, away_id: i64 },

    /// The webhook rejected or never received a post.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, FixtureError>;

impl FixtureError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        FixtureError::FetchFailed { url: url.to_string(), reason: reason.to_string() }
    }

    pub fn badge(url: &str, reason: impl ToString) -> Self {
        FixtureError::BadgeFetchFailed { url: url.to_string(), reason: reason.to_string() }
    }
}
