use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use wc22_dashboard::query::parse_rows_json;
use wc22_dashboard::rows::{CountryRow, MatchRow, PlayerRow, TopScorerRow, decode_rows};
use wc22_dashboard::view_model::{
    TopScorer, dashboard_view, map_matches, map_players, map_teams, map_top_scorers,
    parse_match_date, stats_view,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn scorer(name: &str, goals: u32) -> TopScorer {
    TopScorer {
        name: name.to_string(),
        country: "Somewhere".to_string(),
        goals,
    }
}

#[test]
fn maps_countries_fixture_in_order() {
    let rows = parse_rows_json(&read_fixture("countries.json")).expect("fixture should parse");
    let teams = map_teams(decode_rows::<CountryRow>(rows).expect("rows should decode"));
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Argentina", "France", "Croatia"]);
    assert_eq!(teams[1].id, "2");
    assert_eq!(teams[2].fifa_ranking, Some(12));
}

#[test]
fn players_without_scoring_record_have_zero_goals() {
    let rows = parse_rows_json(&read_fixture("players.json")).expect("fixture should parse");
    let players = map_players(decode_rows::<PlayerRow>(rows).expect("rows should decode"));
    assert_eq!(players.len(), 5);

    let goals: Vec<u32> = players.iter().map(|p| p.goals).collect();
    assert_eq!(goals, vec![8, 0, 1, 0, 0]);

    assert_eq!(players[1].country, "Argentina");
    assert_eq!(players[3].country, "");
    assert_eq!(players[3].position, "");
    assert_eq!(players[4].id, "a7f3");
}

#[test]
fn maps_matches_with_dates_and_embedded_teams() {
    let rows = parse_rows_json(&read_fixture("matches.json")).expect("fixture should parse");
    let matches = map_matches(decode_rows::<MatchRow>(rows).expect("rows should decode"));
    assert_eq!(matches.len(), 2);

    assert_eq!(matches[0].home_team, "Argentina");
    assert_eq!(matches[0].away_team, "France");
    assert_eq!((matches[0].home_score, matches[0].away_score), (Some(3), Some(3)));
    assert_eq!(matches[0].date_label, "2022-12-18");

    assert_eq!(matches[1].match_date, NaiveDate::from_ymd_opt(2022, 11, 20));
    assert_eq!(matches[1].date_label, "2022-11-20");
    assert_eq!(matches[1].stadium, "Al Bayt Stadium");
}

#[test]
fn unparseable_match_date_is_shown_raw() {
    assert!(parse_match_date("soon").is_none());
    let rows = vec![serde_json::json!({
        "id": 9,
        "home_team": { "name": "A" },
        "away_team": { "name": "B" },
        "home_score": 1,
        "away_score": 0,
        "match_date": " TBD ",
    })];
    let matches = map_matches(decode_rows::<MatchRow>(rows).expect("row should decode"));
    assert_eq!(matches[0].match_date, None);
    assert_eq!(matches[0].date_label, "TBD");
    assert_eq!(matches[0].stadium, "");
}

#[test]
fn malformed_row_names_its_index() {
    let rows = vec![
        serde_json::json!({ "id": 1, "name": "Argentina", "fifa_ranking": 1 }),
        serde_json::json!({ "id": 2, "fifa_ranking": 4 }),
    ];
    let err = decode_rows::<CountryRow>(rows).expect_err("missing name should fail");
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn unplayed_match_and_unranked_team_keep_their_rows() {
    let rows = vec![
        serde_json::json!({
            "id": 1,
            "home_team": { "name": "Argentina" },
            "away_team": { "name": "France" },
            "home_score": 3,
            "away_score": 3,
            "match_date": "2022-12-18",
        }),
        serde_json::json!({
            "id": 2,
            "home_team": { "name": "Croatia" },
            "away_team": { "name": "Morocco" },
            "home_score": null,
            "match_date": "2022-12-17",
        }),
    ];
    let matches = map_matches(decode_rows::<MatchRow>(rows).expect("rows should decode"));
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].home_score, matches[0].away_score), (Some(3), Some(3)));
    assert_eq!((matches[1].home_score, matches[1].away_score), (None, None));
    assert_eq!(matches[1].home_team, "Croatia");

    let rows = vec![serde_json::json!({ "id": 7, "name": "Qatar", "fifa_ranking": null })];
    let teams = map_teams(decode_rows::<CountryRow>(rows).expect("row should decode"));
    assert_eq!(teams[0].fifa_ranking, None);
}

#[test]
fn dashboard_reads_top_scorer_from_first_row() {
    let scorers: Vec<TopScorer> = [8, 7, 6, 5, 5]
        .iter()
        .enumerate()
        .map(|(idx, goals)| scorer(&format!("Player {idx}"), *goals))
        .collect();
    let view = dashboard_view(Some(scorers.as_slice()));

    let top = view
        .cards
        .iter()
        .find(|card| card.label == "Top Scorer Goals")
        .expect("top scorer card");
    assert_eq!(top.value, "8");
    assert_eq!(view.top_scorers.first_value(), Some(8));
    assert_eq!(view.top_scorers.len(), 5);
    assert_eq!(view.top_scorers.labels[0], "Player 0");
    assert_eq!(view.top_scorers.datasets[0].label, "Goals Scored");
}

#[test]
fn dashboard_fixed_cards_and_timeline() {
    let view = dashboard_view(Some(&[][..]));
    let values: Vec<(&str, &str)> = view
        .cards
        .iter()
        .map(|card| (card.label, card.value.as_str()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Total Teams", "32"),
            ("Matches Played", "64"),
            ("Total Goals", "172"),
            ("Top Scorer Goals", "0"),
        ]
    );
    assert!(view.top_scorers.is_empty());
    assert_eq!(view.goals_timeline.datasets[0].values, vec![120, 28, 12, 8, 4]);
    assert_eq!(view.goals_timeline.labels[4], "Final");
}

#[test]
fn dashboard_while_loading_has_no_chart_rows() {
    let view = dashboard_view(None);
    assert_eq!(view.cards[3].value, "…");
    assert!(view.top_scorers.is_empty());
}

#[test]
fn top_scorers_fixture_feeds_the_chart() {
    let rows = parse_rows_json(&read_fixture("top_scorers.json")).expect("fixture should parse");
    let scorers = map_top_scorers(decode_rows::<TopScorerRow>(rows).expect("rows should decode"));
    let goals: Vec<u32> = scorers.iter().map(|s| s.goals).collect();
    assert_eq!(goals, vec![8, 7, 6, 5, 5]);
    assert_eq!(scorers[0].country, "France");
    assert_eq!(dashboard_view(Some(scorers.as_slice())).top_scorers.first_value(), Some(8));
}

#[test]
fn stats_view_is_fixed() {
    let view = stats_view();
    let captions: Vec<Option<&str>> = view.cards.iter().map(|card| card.caption).collect();
    assert_eq!(
        captions,
        vec![
            Some("Avg: 2.7 per match"),
            Some("From 5 confederations"),
            Some("Avg: 3.4 per match"),
            Some("Avg: 0.06 per match"),
        ]
    );
    assert_eq!(view.goals_by_team.labels.len(), 6);
    assert_eq!(view.goals_by_team.datasets[0].values, vec![15, 16, 8, 6, 8, 10]);
    assert_eq!(view.card_distribution.datasets[0].values, vec![219, 4]);
}
