use std::collections::HashMap;

use chrono_tz::Tz;
use tracing::error;

use crate::aggregator::{ActiveFixtures, TrackingSet};
use crate::api_football::FixtureSource;
use crate::cards::FormPolicy;
use crate::form::compute_form;
use crate::model::form_symbol::form_string;
use crate::model::{Fixture, FormSymbol, Team};

const BANNER: &str = ":soccer: :soccer: :soccer:";

fn team_label<'a>(team: &'a Team, badge_emojis: &'a HashMap<i64, String>) -> &'a str {
    badge_emojis.get(&team.id).map(|s| s.as_str()).unwrap_or(team.name.as_str())
}

fn side(team: &Team, form: &[FormSymbol], badge_emojis: &HashMap<i64, String>) -> String {
    let label = team_label(team, badge_emojis);
    if form.is_empty() {
        label.to_string()
    } else {
        format!("{} ({})", label, form_string(form))
    }
}

/// One line per fixture: `home (WWDLU) vs away (LDDWW) @ 15:00 (Premier League)`.
/// A side without form is shown by its label alone.
pub fn describe(
    fixture: &Fixture,
    home_form: &[FormSymbol],
    away_form: &[FormSymbol],
    tz: &Tz,
    badge_emojis: &HashMap<i64, String>,
) -> String {
    format!(
        "{} vs {} @ {} ({})",
        side(&fixture.home_team, home_form, badge_emojis),
        side(&fixture.away_team, away_form, badge_emojis),
        fixture.local_start(tz).format("%H:%M"),
        fixture.competition_name
    )
}

/// Describe every active fixture, skipping any whose form cannot be fetched.
pub fn describe_all<S: FixtureSource + ?Sized>(
    fixtures: ActiveFixtures,
    source: &S,
    tz: &Tz,
    policy: FormPolicy,
    tracking: &TrackingSet,
    badge_emojis: &HashMap<i64, String>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for fixture in fixtures {
        let count = policy.text_form_count_for(&fixture, tracking);
        let forms = compute_form(source, &fixture.home_team, count, policy.order)
            .and_then(|home| Ok((home, compute_form(source, &fixture.away_team, count, policy.order)?)));
        match forms {
            Ok((home, away)) => lines.push(describe(&fixture, &home, &away, tz, badge_emojis)),
            Err(e) => error!(error = %e, home = %fixture.home_team.name, away = %fixture.away_team.name, "Skipping fixture description"),
        }
    }
    lines
}

/// Wrap fixture lines in the daily post. `None` when there is nothing to post.
pub fn daily_message(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(format!("{}\n__**Today's Fixtures**__\n{}\n{}", BANNER, lines.join("\n"), BANNER))
}
