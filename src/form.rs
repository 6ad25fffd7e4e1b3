use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api_football::FixtureSource;
use crate::error::Result;
use crate::model::{FormSymbol, Team};

pub const DEFAULT_MATCH_COUNT: usize = 5;

/// Order of the symbols returned by [`compute_form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormOrder {
    /// Oldest fixture first, so a form strip reads left to right in time.
    #[default]
    Chronological,
    /// Latest fixture first.
    MostRecentFirst,
}

/// Fetch the last `match_count` fixtures of `team` and reduce each to a [`FormSymbol`].
#[instrument(level = "info", skip(source, team), fields(team_id = team.id, team = %team.name))]
pub fn compute_form<S: FixtureSource + ?Sized>(
    source: &S,
    team: &Team,
    match_count: usize,
    order: FormOrder,
) -> Result<Vec<FormSymbol>> {
    if match_count == 0 {
        return Ok(Vec::new());
    }

    let mut fixtures = source.last_team_fixtures(team.id, match_count)?;
    fixtures.sort_by_key(|f| f.start_time);
    if fixtures.len() > match_count {
        fixtures.drain(..fixtures.len() - match_count);
    }
    if order == FormOrder::MostRecentFirst {
        fixtures.reverse();
    }

    let form = fixtures
        .iter()
        .map(|f| f.result(team))
        .collect::<Result<Vec<_>>>()?;
    info!(form = %crate::model::form_symbol::form_string(&form), "Computed form");
    Ok(form)
}
