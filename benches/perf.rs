use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use wc22_dashboard::demo_backend::DemoBackend;
use wc22_dashboard::nav::Route;
use wc22_dashboard::pages::load_page;
use wc22_dashboard::query::parse_rows_json;
use wc22_dashboard::rows::{MatchRow, PlayerRow, decode_rows};
use wc22_dashboard::view_model::{map_matches, map_players};

fn synthetic_players(count: u32) -> Vec<Value> {
    (1..=count)
        .map(|id| {
            let top_scorers = if id % 3 == 0 {
                json!([{ "goals": id % 9 }])
            } else {
                json!([])
            };
            json!({
                "id": id,
                "name": format!("Player {id}"),
                "position": "Forward",
                "country": { "name": "Argentina" },
                "top_scorers": top_scorers,
            })
        })
        .collect()
}

fn bench_players_fixture_map(c: &mut Criterion) {
    c.bench_function("players_fixture_map", |b| {
        b.iter(|| {
            let rows = parse_rows_json(black_box(PLAYERS_JSON)).unwrap();
            let players = map_players(decode_rows::<PlayerRow>(rows).unwrap());
            black_box(players.len());
        })
    });
}

fn bench_matches_fixture_map(c: &mut Criterion) {
    c.bench_function("matches_fixture_map", |b| {
        b.iter(|| {
            let rows = parse_rows_json(black_box(MATCHES_JSON)).unwrap();
            let matches = map_matches(decode_rows::<MatchRow>(rows).unwrap());
            black_box(matches.len());
        })
    });
}

fn bench_player_rows_1k(c: &mut Criterion) {
    let rows = synthetic_players(1_000);
    c.bench_function("player_rows_1k", |b| {
        b.iter(|| {
            let players = map_players(decode_rows::<PlayerRow>(black_box(rows.clone())).unwrap());
            black_box(players.len());
        })
    });
}

fn bench_demo_dashboard_load(c: &mut Criterion) {
    let backend = DemoBackend::seeded();
    c.bench_function("demo_dashboard_load", |b| {
        b.iter(|| {
            let data = load_page(black_box(&backend), Route::Dashboard).unwrap();
            black_box(data.len());
        })
    });
}

criterion_group!(
    perf,
    bench_players_fixture_map,
    bench_matches_fixture_map,
    bench_player_rows_1k,
    bench_demo_dashboard_load
);
criterion_main!(perf);

static PLAYERS_JSON: &str = include_str!("../tests/fixtures/players.json");
static MATCHES_JSON: &str = include_str!("../tests/fixtures/matches.json");
