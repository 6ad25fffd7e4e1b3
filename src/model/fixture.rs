use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};
use crate::model::form_symbol::FormSymbol;
use crate::model::record::FixtureRecord;
use crate::model::team::Team;

/// Short status codes reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureStatus {
    #[serde(rename = "TBD")]
    TimeToBeDefined,
    #[serde(rename = "NS")]
    NotStarted,
    #[serde(rename = "1H")]
    FirstHalf,
    #[serde(rename = "HT")]
    HalfTime,
    #[serde(rename = "2H")]
    SecondHalf,
    #[serde(rename = "ET")]
    ExtraTime,
    #[serde(rename = "P")]
    Penalties,
    #[serde(rename = "BT")]
    BreakTime,
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "AET")]
    AfterExtraTime,
    #[serde(rename = "PEN")]
    AfterPenalties,
    #[serde(rename = "SUSP")]
    Suspended,
    #[serde(rename = "INT")]
    Interrupted,
    #[serde(rename = "LIVE")]
    Live,
    #[serde(rename = "PST")]
    Postponed,
    #[serde(rename = "CANC")]
    Cancelled,
    #[serde(rename = "ABD")]
    Abandoned,
    #[serde(rename = "AWD")]
    Awarded,
    #[serde(rename = "WO")]
    Walkover,
    #[serde(other)]
    Unknown,
}

impl FixtureStatus {
    pub fn from_code(code: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(code.trim().to_string()))
            .unwrap_or(FixtureStatus::Unknown)
    }

    /// Postponed, cancelled, abandoned, awarded and walkover fixtures carry no usable result.
    pub fn is_inactive(self) -> bool {
        matches!(
            self,
            FixtureStatus::Postponed
                | FixtureStatus::Cancelled
                | FixtureStatus::Abandoned
                | FixtureStatus::Awarded
                | FixtureStatus::Walkover
        )
    }
}

/// One scheduled or completed match.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    pub venue: Option<String>,
    pub competition_name: String,
    pub status: FixtureStatus,
    pub home_goals: Option<i64>,
    pub away_goals: Option<i64>,
}

impl Fixture {
    /// Convert a raw API record. Fails only when the timestamp is out of range.
    pub fn from_record(record: FixtureRecord) -> Result<Self> {
        let start_time = Utc
            .timestamp_opt(record.event_timestamp, 0)
            .single()
            .ok_or_else(|| {
                FixtureError::fetch("fixture record", format!("bad event_timestamp {}", record.event_timestamp))
            })?;
        Ok(Self {
            id: record.fixture_id,
            start_time,
            home_team: Team::from(record.home_team),
            away_team: Team::from(record.away_team),
            venue: record.venue.filter(|v| !v.trim().is_empty()),
            competition_name: record.league.name,
            status: FixtureStatus::from_code(&record.status_short),
            home_goals: record.goals_home_team,
            away_goals: record.goals_away_team,
        })
    }

    pub fn is_inactive(&self) -> bool {
        self.status.is_inactive()
    }

    /// True when the fixture kicks off on `today` in `tz` and has not been called off.
    pub fn is_today(&self, today: NaiveDate, tz: &Tz) -> bool {
        self.local_start(tz).date_naive() == today && !self.is_inactive()
    }

    pub fn local_start(&self, tz: &Tz) -> DateTime<Tz> {
        self.start_time.with_timezone(tz)
    }

    /// (home id, away id); fixtures sharing this pair are the same match for aggregation.
    pub fn pairing(&self) -> (i64, i64) {
        (self.home_team.id, self.away_team.id)
    }

    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team.id == team_id || self.away_team.id == team_id
    }

    /// Classify the result of this fixture for `team`.
    pub fn result(&self, team: &Team) -> Result<FormSymbol> {
        let (ours, theirs) = if self.home_team == *team {
            (self.home_goals, self.away_goals)
        } else if self.away_team == *team {
            (self.away_goals, self.home_goals)
        } else {
            return Err(FixtureError::InvalidTeamAssociation {
                team_id: team.id,
                home_id: self.home_team.id,
                away_id: self.away_team.id,
            });
        };

        if self.is_inactive() {
            return Ok(FormSymbol::Unknown);
        }

        Ok(match (ours, theirs) {
            (Some(us), Some(them)) if us > them => FormSymbol::Win,
            (Some(us), Some(them)) if us < them => FormSymbol::Loss,
            (Some(_), Some(_)) => FormSymbol::Draw,
            _ => FormSymbol::Unknown,
        })
    }
}
