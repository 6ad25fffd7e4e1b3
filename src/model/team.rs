use std::hash::{Hash, Hasher};

use crate::model::record::TeamRecord;

/// A club as reported by the fixtures API. Two teams are the same team when their ids match.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub badge_url: Option<String>,
}

impl Team {
    pub fn new(id: i64, name: impl Into<String>, badge_url: Option<String>) -> Self {
        Self { id, name: name.into(), badge_url }
    }
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.team_id,
            name: record.team_name,
            badge_url: record.logo.filter(|url| !url.trim().is_empty()),
        }
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Team {}

impl Hash for Team {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
