use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::api_football::FixtureSource;
use crate::model::Fixture;

/// How a candidate fixture is judged to be already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupRule {
    /// Same (home id, away id) pair.
    #[default]
    Pairing,
    /// Either team already appears in an accepted fixture.
    SeenTeams,
}

/// Teams and competitions whose fixtures are posted each cycle.
#[derive(Debug, Clone, Default)]
pub struct TrackingSet {
    pub tracked_team_ids: BTreeSet<i64>,
    pub tracked_competition_ids: BTreeSet<i64>,
}

impl TrackingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_teams<I: IntoIterator<Item = i64>>(&mut self, teams: I) {
        self.tracked_team_ids.extend(teams);
    }

    pub fn track_competitions<I: IntoIterator<Item = i64>>(&mut self, competitions: I) {
        self.tracked_competition_ids.extend(competitions);
    }

    pub fn is_tracked_team(&self, team_id: i64) -> bool {
        self.tracked_team_ids.contains(&team_id)
    }

    /// Fetch and deduplicate the fixtures to present on `today`.
    ///
    /// One request per tracked team (its next fixture) and one per tracked competition
    /// (its fixtures on `today`). A failed request is logged and skipped. With
    /// `today_only`, fixtures not kicking off on `today` in `tz` and called-off fixtures are dropped.
    #[instrument(level = "info", skip(self, source, tz), fields(teams = self.tracked_team_ids.len(), competitions = self.tracked_competition_ids.len()))]
    pub fn aggregate<S: FixtureSource + ?Sized>(
        &self,
        source: &S,
        today: NaiveDate,
        tz: &Tz,
        today_only: bool,
        rule: DedupRule,
    ) -> ActiveFixtures {
        let mut active = ActiveFixtures::with_rule(rule);

        for &team_id in &self.tracked_team_ids {
            match source.next_team_fixture(team_id) {
                Ok(Some(fixture)) => {
                    if today_only && !fixture.is_today(today, tz) {
                        continue;
                    }
                    active.push(fixture);
                }
                Ok(None) => info!(team_id, "No upcoming fixture for team"),
                Err(e) => error!(error = %e, team_id, "Skipping team after fetch failure"),
            }
        }

        for &competition_id in &self.tracked_competition_ids {
            match source.competition_fixtures(competition_id, today) {
                Ok(fixtures) => {
                    for fixture in fixtures {
                        if today_only && !fixture.is_today(today, tz) {
                            continue;
                        }
                        active.push(fixture);
                    }
                }
                Err(e) => error!(error = %e, competition_id, "Skipping competition after fetch failure"),
            }
        }

        active.sort();
        info!(count = active.len(), "Aggregated active fixtures");
        active
    }
}

/// The deduplicated fixtures selected for one posting cycle.
///
/// Owned by the cycle: rendering drains it front to back.
#[derive(Debug, Clone, Default)]
pub struct ActiveFixtures {
    fixtures: VecDeque<Fixture>,
    rule: DedupRule,
    seen_pairs: HashSet<(i64, i64)>,
    seen_teams: HashSet<i64>,
}

impl ActiveFixtures {
    pub fn with_rule(rule: DedupRule) -> Self {
        Self { rule, ..Self::default() }
    }

    /// Add `fixture` unless it duplicates one already present. Returns whether it was added.
    pub fn push(&mut self, fixture: Fixture) -> bool {
        let (home, away) = fixture.pairing();
        let duplicate = match self.rule {
            DedupRule::Pairing => self.seen_pairs.contains(&(home, away)),
            DedupRule::SeenTeams => self.seen_teams.contains(&home) || self.seen_teams.contains(&away),
        };
        if duplicate {
            return false;
        }
        self.seen_pairs.insert((home, away));
        self.seen_teams.insert(home);
        self.seen_teams.insert(away);
        self.fixtures.push_back(fixture);
        true
    }

    /// Order by kick-off, then home team name.
    pub fn sort(&mut self) {
        self.fixtures
            .make_contiguous()
            .sort_by(|a, b| {
                a.start_time
                    .cmp(&b.start_time)
                    .then_with(|| a.home_team.name.cmp(&b.home_team.name))
            });
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter()
    }

    /// Remove and return the next fixture to present.
    pub fn pop_front(&mut self) -> Option<Fixture> {
        self.fixtures.pop_front()
    }
}

impl IntoIterator for ActiveFixtures {
    type Item = Fixture;
    type IntoIter = std::collections::vec_deque::IntoIter<Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.into_iter()
    }
}
