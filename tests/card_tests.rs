mod common;

use chrono::Weekday;
use chrono_tz::Tz;
use football_fixtures_lambda_rust::aggregator::TrackingSet;
use football_fixtures_lambda_rust::cards::{CardStream, FormPolicy};
use football_fixtures_lambda_rust::form::FormOrder;
use football_fixtures_lambda_rust::model::{FormSymbol, Team};
use football_fixtures_lambda_rust::render::{CardLayout, CardRenderer, header_colour};
use image::Rgba;

use common::*;

fn london() -> Tz {
    "Europe/London".parse().unwrap()
}

fn crisp_layout() -> CardLayout {
    CardLayout { supersample: 1, ..CardLayout::default() }
}

fn assert_close(actual: &Rgba<u8>, expected: [u8; 4]) {
    for c in 0..4 {
        let diff = (actual[c] as i16 - expected[c] as i16).abs();
        assert!(diff <= 3, "pixel {:?} differs from {:?}", actual, expected);
    }
}

#[test]
fn card_has_reference_dimensions_and_sections() {
    let api = FakeApi::new().with_last(ARSENAL, LAST_ARSENAL);
    let fixture = fixtures(NEXT_ARSENAL).remove(0);
    let renderer = CardRenderer::new(&BlockPainter, &api, crisp_layout(), london());

    use FormSymbol::*;
    let card = renderer.render_card(&fixture, &[], &[Win, Win, Draw, Unknown, Loss], 10);
    assert_eq!(card.dimensions(), (500, 310));

    // Saturday header band, left of the centred header text
    assert_close(card.get_pixel(20, 20), header_colour(Weekday::Sat).0);
    // Header text block ("Etihad Stadium @ 17:30" is the widest line)
    assert_close(card.get_pixel(250, 35), [255, 255, 255, 255]);
    // Both crests fetched and centred in their slots
    assert_close(card.get_pixel(110, 170), [200, 16, 46, 255]);
    assert_close(card.get_pixel(390, 170), [200, 16, 46, 255]);
    // Away form row: cell corners are outside the letter block
    assert_close(card.get_pixel(293, 283), FormSymbol::Win.colour());
    assert_close(card.get_pixel(333, 283), FormSymbol::Draw.colour());
    assert_close(card.get_pixel(353, 283), FormSymbol::Unknown.colour());
    assert_close(card.get_pixel(373, 283), FormSymbol::Loss.colour());
    // Outline gap and cells beyond the form length stay transparent
    assert_eq!(card.get_pixel(290, 280)[3], 0);
    assert_eq!(card.get_pixel(393, 283)[3], 0);
    // Home team had no form
    assert_eq!(card.get_pixel(13, 283)[3], 0);
    // VS label in the gap
    let vs = card.get_pixel(250, 170);
    assert!(vs[0] >= 250 && (75..=85).contains(&vs[3]), "vs pixel {:?}", vs);
}

#[test]
fn header_text_names_competition_venue_and_local_kickoff() {
    let api = FakeApi::new();
    let renderer = CardRenderer::new(&BlockPainter, &api, crisp_layout(), london());
    let mut fixture = fixtures(NEXT_ARSENAL).remove(0);
    assert_eq!(renderer.header_text(&fixture), "Premier League\nEtihad Stadium @ 17:30");

    fixture.venue = None;
    assert_eq!(renderer.header_text(&fixture), "Premier League\n17:30");
}

#[test]
fn broken_crest_falls_back_to_placeholder() {
    let api = FakeApi::new();
    let mut fixture = fixtures(NEXT_ARSENAL).remove(0);
    fixture.home_team = Team::new(MAN_CITY, "Manchester City", Some("https://broken.invalid/50.png".into()));
    fixture.away_team.badge_url = None;

    let renderer = CardRenderer::new(&BlockPainter, &api, crisp_layout(), london());
    let card = renderer.render_card(&fixture, &[], &[], 0);

    assert_eq!(card.dimensions(), (500, 290));
    assert_close(card.get_pixel(110, 170), [49, 55, 61, 255]);
    assert_close(card.get_pixel(390, 170), [49, 55, 61, 255]);
}

#[test]
fn supersampled_text_still_lands_in_place() {
    let api = FakeApi::new();
    let fixture = fixtures(NEXT_ARSENAL).remove(0);
    let renderer = CardRenderer::new(&BlockPainter, &api, CardLayout { supersample: 3, ..CardLayout::default() }, london());
    let card = renderer.render_card(&fixture, &[], &[], 0);
    assert_close(card.get_pixel(250, 35), [255, 255, 255, 255]);
}

#[test]
fn stream_renders_tracked_fixture_with_both_badges() {
    let api = FakeApi::new()
        .with_next(ARSENAL, NEXT_ARSENAL)
        .with_next(MAN_CITY, NEXT_ARSENAL)
        .with_last(ARSENAL, LAST_ARSENAL);
    let mut tracking = TrackingSet::new();
    tracking.track_teams([ARSENAL, MAN_CITY]);
    let active = tracking.aggregate(&api, today(), &london(), true, Default::default());

    let renderer = CardRenderer::new(&BlockPainter, &api, crisp_layout(), london());
    let policy = FormPolicy { team_form_count: 5, order: FormOrder::Chronological, ..FormPolicy::default() };
    let stream = CardStream::new(active, &tracking, &api, renderer, policy);
    assert_eq!(stream.remaining(), 1);

    let cards: Vec<_> = stream.collect::<Result<_, _>>().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].image.dimensions(), (500, 330));
    let badges = api.requests.borrow().iter().filter(|r| r.starts_with("badge")).count();
    assert_eq!(badges, 2);
    assert!(cards[0].to_png().unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn failed_form_fetch_surfaces_and_stream_continues() {
    let api = FakeApi::new()
        .with_next(ARSENAL, NEXT_ARSENAL)
        .with_competition(PREMIER_LEAGUE, COMPETITION_TODAY)
        .failing_team(MAN_CITY);
    let mut tracking = TrackingSet::new();
    tracking.track_teams([ARSENAL]);
    tracking.track_competitions([PREMIER_LEAGUE]);
    let active = tracking.aggregate(&api, today(), &london(), true, Default::default());
    assert_eq!(active.len(), 3);

    let renderer = CardRenderer::new(&BlockPainter, &api, crisp_layout(), london());
    let results: Vec<_> = CardStream::new(active, &tracking, &api, renderer, FormPolicy::default()).collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
    // Competition-only fixtures carry no form row
    assert_eq!(results[0].as_ref().unwrap().image.height(), 290);
}
