mod common;

use football_fixtures_lambda_rust::FixtureError;
use football_fixtures_lambda_rust::form::FormOrder;
use football_fixtures_lambda_rust::handler::{Mode, Post, Presentation, Request, run_cycle};

use common::*;

fn request(presentation: &str) -> Request {
    serde_json::from_value(serde_json::json!({
        "mode": "test",
        "discord_hook_url": "prod",
        "test_discord_hook_url": "test",
        "api_key": "secret",
        "font_path": "/opt/fonts/Wotfard-Bold.otf",
        "tracked_team_ids": [ARSENAL, MAN_CITY],
        "presentation": presentation,
        "badge_emojis": { "42": "<:afc:735119993175277578>" }
    }))
    .unwrap()
}

#[test]
fn request_defaults() {
    let req = request("cards");
    assert!(matches!(req.mode, Mode::Test));
    assert_eq!(req.presentation, Presentation::Cards);
    assert_eq!(req.timezone, "Europe/London");
    assert!(req.today_only);
    assert!(req.tracked_competition_ids.is_empty());
    assert_eq!(req.form.team_form_count, 10);
    assert_eq!(req.form.competition_form_count, 0);
    assert_eq!(req.form.text_form_count, 5);
    assert_eq!(req.form.order, FormOrder::Chronological);
    assert_eq!(req.layout.badge_size, 200);
    assert_eq!(req.request_timeout_secs, 10);
    assert_eq!(req.tracking_set().tracked_team_ids.len(), 2);
}

#[test]
fn request_overrides_nested_settings() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "mode": "production",
        "discord_hook_url": "prod",
        "test_discord_hook_url": "test",
        "api_key": "secret",
        "timezone": "America/Los_Angeles",
        "form": { "team_form_count": 6, "order": "most_recent_first" },
        "layout": { "badge_size": 120, "supersample": 1 }
    }))
    .unwrap();
    assert_eq!(req.form.team_form_count, 6);
    assert_eq!(req.form.order, FormOrder::MostRecentFirst);
    assert_eq!(req.layout.badge_size, 120);
    assert_eq!(req.layout.pad, 10);
    assert!(req.timezone().is_ok());
}

#[test]
fn unknown_timezone_is_a_config_error() {
    let mut req = request("cards");
    req.timezone = "Mars/Olympus_Mons".into();
    assert!(matches!(req.timezone().unwrap_err(), FixtureError::Config(_)));
}

#[test]
fn today_fixture_between_tracked_teams_posts_one_card() {
    let api = FakeApi::new()
        .with_next(ARSENAL, NEXT_ARSENAL)
        .with_next(MAN_CITY, NEXT_ARSENAL)
        .with_last(ARSENAL, LAST_ARSENAL);
    let mut posts = Vec::new();
    let report = run_cycle(&request("cards"), &api, Some(&BlockPainter), today(), |post| {
        posts.push(post);
        Ok(())
    })
    .unwrap();

    assert_eq!((report.posted, report.failed), (1, 0));
    let Post::Card { file_name, png } = &posts[0] else { panic!("expected a card") };
    assert_eq!(file_name, "202010171630_50_vs_42.png");
    let image = image::load_from_memory(png).unwrap();
    assert_eq!((image.width(), image.height()), (500, 310));
}

#[test]
fn text_presentation_posts_single_summary() {
    let api = FakeApi::new()
        .with_next(ARSENAL, NEXT_ARSENAL)
        .with_last(ARSENAL, LAST_ARSENAL);
    let mut posts = Vec::new();
    let report = run_cycle::<_, BlockPainter, _>(&request("text"), &api, None, today(), |post| {
        posts.push(post);
        Ok(())
    })
    .unwrap();

    assert_eq!(report.posted, 1);
    let Post::Text(message) = &posts[0] else { panic!("expected text") };
    assert!(message.starts_with(":soccer: :soccer: :soccer:\n__**Today's Fixtures**__\n"), "{message}");
    assert!(
        message.contains("Manchester City vs <:afc:735119993175277578> (WWDUL) @ 17:30 (Premier League)"),
        "{message}"
    );
}

#[test]
fn empty_day_posts_nothing() {
    let api = FakeApi::new().with_competition(PREMIER_LEAGUE, EMPTY);
    let mut req = request("cards");
    req.tracked_team_ids.clear();
    req.tracked_competition_ids = vec![PREMIER_LEAGUE];

    let mut posts = 0;
    let report = run_cycle(&req, &api, Some(&BlockPainter), today(), |_| {
        posts += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(posts, 0);
    assert_eq!(report.summary(Presentation::Cards), "No fixtures to post (skipped)");
}

#[test]
fn delivery_failures_are_counted_not_fatal() {
    let api = FakeApi::new()
        .with_competition(PREMIER_LEAGUE, COMPETITION_TODAY);
    let mut req = request("cards");
    req.tracked_team_ids.clear();
    req.tracked_competition_ids = vec![PREMIER_LEAGUE];

    let mut calls = 0;
    let report = run_cycle(&req, &api, Some(&BlockPainter), today(), |_| {
        calls += 1;
        if calls == 1 {
            Err(FixtureError::DeliveryFailed("webhook 500".into()))
        } else {
            Ok(())
        }
    })
    .unwrap();
    assert_eq!((report.posted, report.failed), (2, 1));
    assert_eq!(report.summary(Presentation::Cards), "Posted 2 cards (1 failed)");
}

#[test]
fn cards_without_font_is_a_config_error() {
    let api = FakeApi::new().with_next(ARSENAL, NEXT_ARSENAL);
    let err = run_cycle::<_, BlockPainter, _>(&request("cards"), &api, None, today(), |_| Ok(())).unwrap_err();
    assert!(matches!(err, FixtureError::Config(_)));
}
