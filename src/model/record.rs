use serde::{Deserialize, Deserializer, Serialize};

/// Envelope returned by every api-football v2 fixtures endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct FixturesDocument {
    pub api: FixturesPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixturesPayload {
    #[serde(default)]
    pub results: Option<i64>,
    pub fixtures: Vec<FixtureRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(default)]
    pub fixture_id: Option<i64>,
    pub event_timestamp: i64,
    #[serde(rename = "homeTeam")]
    pub home_team: TeamRecord,
    #[serde(rename = "awayTeam")]
    pub away_team: TeamRecord,
    pub venue: Option<String>,
    pub league: LeagueRecord,
    #[serde(rename = "statusShort")]
    pub status_short: String,
    #[serde(rename = "goalsHomeTeam", default, deserialize_with = "lenient_goals")]
    pub goals_home_team: Option<i64>,
    #[serde(rename = "goalsAwayTeam", default, deserialize_with = "lenient_goals")]
    pub goals_away_team: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: i64,
    pub team_name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeagueRecord {
    pub name: String,
}

// The API reports goals as null before kick-off and has been seen sending strings.
fn lenient_goals<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
