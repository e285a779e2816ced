use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};
use wc22_dashboard::demo_backend::DemoBackend;
use wc22_dashboard::fetch_worker::run_fetch;
use wc22_dashboard::nav::Route;
use wc22_dashboard::pages::{PageData, load_page};
use wc22_dashboard::query::{QueryClient, SelectQuery};
use wc22_dashboard::state::{AppState, Delta, PageView, apply_delta};
use wc22_dashboard::view_model::dashboard_view;

/// Answers every select from a fixed table map, or fails every time.
struct ScriptedClient {
    tables: HashMap<&'static str, Vec<Value>>,
    fail_with: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn with_rows(table: &'static str, rows: Vec<Value>) -> Self {
        Self {
            tables: HashMap::from([(table, rows)]),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            tables: HashMap::new(),
            fail_with: Some(message),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl QueryClient for ScriptedClient {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(query.table.clone());
        if let Some(message) = self.fail_with {
            return Err(anyhow!(message));
        }
        Ok(self
            .tables
            .get(query.table.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

fn countries() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Argentina", "fifa_ranking": 1 }),
        json!({ "id": 2, "name": "France", "fifa_ranking": 4 }),
        json!({ "id": 3, "name": "Croatia", "fifa_ranking": 12 }),
    ]
}

fn warn_count(state: &AppState, prefix: &str) -> usize {
    state
        .logs
        .iter()
        .filter(|line| line.starts_with(prefix))
        .count()
}

#[test]
fn fetching_pages_start_loading_with_no_rows() {
    let mut state = AppState::new();
    for route in [Route::Dashboard, Route::Teams, Route::Players, Route::Matches] {
        let cmd = state.mount(route).expect("page should fetch on mount");
        assert_eq!(cmd.route, route);
        assert_eq!(state.page.mount_id(), Some(cmd.mount));
        assert!(state.page.is_loading());
        assert_eq!(state.page.item_count(), 0);
    }
}

#[test]
fn stats_page_never_fetches() {
    let mut state = AppState::new();
    assert!(state.mount(Route::Stats).is_none());
    assert_eq!(state.page, PageView::Stats);
    assert!(!state.page.is_loading());
}

#[test]
fn successful_fetch_keeps_backend_order() {
    let client = ScriptedClient::with_rows("countries", countries());
    let mut state = AppState::new();
    let cmd = state.mount(Route::Teams).expect("teams fetch");

    apply_delta(&mut state, run_fetch(&client, cmd));

    let PageView::Teams(page) = &state.page else {
        panic!("teams page should still be mounted");
    };
    assert!(!page.loading);
    let names: Vec<&str> = page.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Argentina", "France", "Croatia"]);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] Loaded 3 teams"));
    assert_eq!(client.calls(), vec!["countries"]);
}

#[test]
fn failed_fetch_clears_loading_and_logs_once() {
    let client = ScriptedClient::failing("connection refused");
    let mut state = AppState::new();
    let cmd = state.mount(Route::Players).expect("players fetch");

    apply_delta(&mut state, run_fetch(&client, cmd));

    assert!(!state.page.is_loading());
    assert_eq!(state.page.item_count(), 0);
    assert!(
        state
            .page
            .error()
            .is_some_and(|err| err.contains("connection refused"))
    );
    assert_eq!(warn_count(&state, "[WARN] Error fetching players"), 1);
    assert_eq!(client.calls().len(), 1);
}

#[test]
fn rows_for_another_page_count_as_a_failed_fetch() {
    let mut state = AppState::new();
    let cmd = state.mount(Route::Teams).expect("teams fetch");

    apply_delta(
        &mut state,
        Delta::PageLoaded {
            route: cmd.route,
            mount: cmd.mount,
            result: Ok(PageData::Players(Vec::new())),
        },
    );

    assert!(!state.page.is_loading());
    assert_eq!(state.page.item_count(), 0);
    assert!(
        state
            .page
            .error()
            .is_some_and(|err| err.contains("players rows"))
    );
    assert_eq!(warn_count(&state, "[WARN] Error fetching teams"), 1);
}

#[test]
fn result_for_unmounted_page_is_discarded() {
    let client = ScriptedClient::with_rows("countries", countries());
    let mut state = AppState::new();
    let teams = state.mount(Route::Teams).expect("teams fetch");
    let players = state.navigate(Route::Players).expect("players fetch");
    assert_ne!(teams.mount, players.mount);

    apply_delta(&mut state, run_fetch(&client, teams));

    assert_eq!(state.page.route(), Route::Players);
    assert!(state.page.is_loading());
    assert_eq!(state.page.item_count(), 0);
}

#[test]
fn stale_failure_is_still_logged_once() {
    let client = ScriptedClient::failing("timeout");
    let mut state = AppState::new();
    let teams = state.mount(Route::Teams).expect("teams fetch");
    state.navigate(Route::Matches);

    apply_delta(&mut state, run_fetch(&client, teams));

    assert_eq!(warn_count(&state, "[WARN] Error fetching teams"), 1);
    assert_eq!(state.page.route(), Route::Matches);
    assert!(state.page.is_loading());
    assert_eq!(state.page.error(), None);
}

#[test]
fn reload_supersedes_the_previous_mount() {
    let client = ScriptedClient::with_rows("countries", countries());
    let mut state = AppState::new();
    let first = state.mount(Route::Teams).expect("teams fetch");
    let second = state.reload().expect("reload fetch");
    assert_eq!(second.route, Route::Teams);

    apply_delta(&mut state, run_fetch(&client, first));
    assert!(state.page.is_loading());

    apply_delta(&mut state, run_fetch(&client, second));
    assert!(!state.page.is_loading());
    assert_eq!(state.page.item_count(), 3);
}

#[test]
fn remount_discards_previous_visit_data() {
    let client = ScriptedClient::with_rows("countries", countries());
    let mut state = AppState::new();
    let cmd = state.mount(Route::Teams).expect("teams fetch");
    apply_delta(&mut state, run_fetch(&client, cmd));
    assert_eq!(state.page.item_count(), 3);

    state.navigate(Route::Players);
    state.navigate(Route::Teams);
    assert!(state.page.is_loading());
    assert_eq!(state.page.item_count(), 0);
}

#[test]
fn navigating_to_the_current_page_keeps_it() {
    let client = ScriptedClient::with_rows("countries", countries());
    let mut state = AppState::new();
    let cmd = state.mount(Route::Teams).expect("teams fetch");
    apply_delta(&mut state, run_fetch(&client, cmd));

    assert!(state.navigate(Route::Teams).is_none());
    assert_eq!(state.page.item_count(), 3);
}

#[test]
fn dashboard_top_scorer_scenario() {
    let rows = [8, 7, 6, 5, 5]
        .iter()
        .enumerate()
        .map(|(idx, goals)| {
            json!({
                "name": format!("Player {idx}"),
                "country": { "name": "Country" },
                "top_scorers": [{ "goals": goals }],
            })
        })
        .collect();
    let client = ScriptedClient::with_rows("players", rows);

    let PageData::TopScorers(scorers) =
        load_page(&client, Route::Dashboard).expect("dashboard loads")
    else {
        panic!("dashboard should load top scorers");
    };
    let view = dashboard_view(Some(scorers.as_slice()));
    assert_eq!(view.cards[3].label, "Top Scorer Goals");
    assert_eq!(view.cards[3].value, "8");
    assert_eq!(view.top_scorers.first_value(), Some(8));
    assert_eq!(view.top_scorers.len(), 5);
}

#[test]
fn matches_come_back_newest_first() {
    let backend = DemoBackend::new(HashMap::from([(
        "matches".to_string(),
        vec![
            json!({
                "id": 1,
                "home_team": { "name": "Qatar" },
                "away_team": { "name": "Ecuador" },
                "home_score": 0,
                "away_score": 2,
                "match_date": "2022-11-20",
                "stadium": "Al Bayt Stadium",
            }),
            json!({
                "id": 2,
                "home_team": { "name": "Argentina" },
                "away_team": { "name": "France" },
                "home_score": 3,
                "away_score": 3,
                "match_date": "2022-12-18",
                "stadium": "Lusail Stadium",
            }),
        ],
    )]));

    let PageData::Matches(matches) = load_page(&backend, Route::Matches).expect("matches load")
    else {
        panic!("matches page should load matches");
    };
    let dates: Vec<&str> = matches.iter().map(|m| m.date_label.as_str()).collect();
    assert_eq!(dates, vec!["2022-12-18", "2022-11-20"]);
}

#[test]
fn load_page_rejects_the_stats_page() {
    let client = ScriptedClient::with_rows("countries", countries());
    assert!(load_page(&client, Route::Stats).is_err());
    assert!(client.calls().is_empty());
}

#[test]
fn log_deltas_are_appended() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Log("[INFO] hello".to_string()));
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] hello"));
}

#[test]
fn log_buffer_is_bounded() {
    let mut state = AppState::new();
    for idx in 0..250 {
        state.push_log(format!("[INFO] line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
