use chrono::NaiveDate;

use crate::chart::{
    self, BLUE, BLUE_FILL, ChartData, ColorScheme, Dataset, GOLD, GOLD_FILL, ORANGE, ORANGE_FILL,
    PINK, PINK_FILL, PURPLE, PURPLE_FILL, Rgba, TEAL, TEAL_FILL,
};
use crate::rows::{
    CountryRow, Embedded, GoalsRef, MatchRow, PlayerRow, TopScorerRow, embedded_name,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCard {
    pub id: String,
    pub name: String,
    /// Unranked teams come back without a ranking.
    pub fifa_ranking: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub id: String,
    pub name: String,
    pub country: String,
    pub position: String,
    pub goals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    /// `None` until the match has been played.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub match_date: Option<NaiveDate>,
    pub date_label: String,
    pub stadium: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopScorer {
    pub name: String,
    pub country: String,
    pub goals: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub caption: Option<&'static str>,
    pub accent: Rgba,
}

impl StatCard {
    fn new(icon: &'static str, label: &'static str, value: impl ToString, accent: Rgba) -> Self {
        Self {
            icon,
            label,
            value: value.to_string(),
            caption: None,
            accent,
        }
    }

    fn caption(mut self, caption: &'static str) -> Self {
        self.caption = Some(caption);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub top_scorers: ChartData,
    pub goals_timeline: ChartData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub cards: Vec<StatCard>,
    pub goals_by_team: ChartData,
    pub card_distribution: ChartData,
}

// Tournament-wide figures for Qatar 2022.
pub const TOTAL_TEAMS: u32 = 32;
pub const MATCHES_PLAYED: u32 = 64;
pub const TOTAL_GOALS: u32 = 172;
pub const YELLOW_CARDS: u32 = 219;
pub const RED_CARDS: u32 = 4;

const ICON_TROPHY: &str = "🏆";
const ICON_MEDAL: &str = "🏅";
const ICON_GOAL: &str = "⚽";
const ICON_AWARD: &str = "★";
const ICON_FLAG: &str = "⚑";
const ICON_WARNING: &str = "⚠";

const ACCENT_YELLOW: Rgba = chart::rgba(250, 204, 21, 1.0);
const ACCENT_BLUE: Rgba = chart::rgba(96, 165, 250, 1.0);
const ACCENT_GREEN: Rgba = chart::rgba(74, 222, 128, 1.0);
const ACCENT_PURPLE: Rgba = chart::rgba(192, 132, 252, 1.0);
const ACCENT_RED: Rgba = chart::rgba(248, 113, 113, 1.0);

/// Goals from an optional scoring record. No record means zero goals.
fn goals_from(record: Option<&Embedded<GoalsRef>>) -> u32 {
    record
        .and_then(Embedded::first)
        .and_then(|r| r.goals)
        .unwrap_or(0)
}

pub fn map_teams(rows: Vec<CountryRow>) -> Vec<TeamCard> {
    rows.into_iter()
        .map(|row| TeamCard {
            id: row.id,
            name: row.name,
            fifa_ranking: row.fifa_ranking,
        })
        .collect()
}

pub fn map_players(rows: Vec<PlayerRow>) -> Vec<PlayerCard> {
    rows.into_iter()
        .map(|row| PlayerCard {
            goals: goals_from(row.top_scorers.as_ref()),
            country: embedded_name(row.country.as_ref()),
            id: row.id,
            name: row.name,
            position: row.position.unwrap_or_default(),
        })
        .collect()
}

pub fn map_matches(rows: Vec<MatchRow>) -> Vec<MatchCard> {
    rows.into_iter()
        .map(|row| {
            let match_date = parse_match_date(&row.match_date);
            let date_label = match_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| row.match_date.trim().to_string());
            MatchCard {
                home_team: embedded_name(row.home_team.as_ref()),
                away_team: embedded_name(row.away_team.as_ref()),
                id: row.id,
                home_score: row.home_score,
                away_score: row.away_score,
                match_date,
                date_label,
                stadium: row.stadium.unwrap_or_default(),
            }
        })
        .collect()
}

pub fn map_top_scorers(rows: Vec<TopScorerRow>) -> Vec<TopScorer> {
    rows.into_iter()
        .map(|row| TopScorer {
            goals: goals_from(row.top_scorers.as_ref()),
            country: embedded_name(row.country.as_ref()),
            name: row.name,
        })
        .collect()
}

/// Accepts a plain date or anything that starts with one (timestamps).
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn top_scorer_goals(scorers: &[TopScorer]) -> u32 {
    scorers.first().map(|s| s.goals).unwrap_or(0)
}

pub fn top_scorers_chart(scorers: &[TopScorer]) -> ChartData {
    ChartData::single(
        scorers.iter().map(|s| s.name.clone()).collect(),
        Dataset {
            label: "Goals Scored".to_string(),
            values: scorers.iter().map(|s| u64::from(s.goals)).collect(),
            colors: ColorScheme::single(GOLD_FILL, GOLD),
        },
    )
}

pub fn goals_timeline_chart() -> ChartData {
    let rounds = [
        ("Group Stage", 120),
        ("Round of 16", 28),
        ("Quarter-finals", 12),
        ("Semi-finals", 8),
        ("Final", 4),
    ];
    ChartData::single(
        rounds.iter().map(|(label, _)| label.to_string()).collect(),
        Dataset {
            label: "Goals per Round".to_string(),
            values: rounds.iter().map(|(_, goals)| *goals).collect(),
            colors: ColorScheme::single(TEAL_FILL, TEAL),
        },
    )
}

/// `scorers` is `None` while the fetch is outstanding.
pub fn dashboard_view(scorers: Option<&[TopScorer]>) -> DashboardView {
    let top_value = match scorers {
        Some(scorers) => top_scorer_goals(scorers).to_string(),
        None => "…".to_string(),
    };
    DashboardView {
        cards: vec![
            StatCard::new(ICON_TROPHY, "Total Teams", TOTAL_TEAMS, ACCENT_YELLOW),
            StatCard::new(ICON_MEDAL, "Matches Played", MATCHES_PLAYED, ACCENT_BLUE),
            StatCard::new(ICON_GOAL, "Total Goals", TOTAL_GOALS, ACCENT_GREEN),
            StatCard::new(ICON_AWARD, "Top Scorer Goals", top_value, ACCENT_PURPLE),
        ],
        top_scorers: top_scorers_chart(scorers.unwrap_or(&[])),
        goals_timeline: goals_timeline_chart(),
    }
}

pub fn stats_view() -> StatsView {
    let teams = [
        ("Argentina", 15),
        ("France", 16),
        ("Croatia", 8),
        ("Morocco", 6),
        ("Brazil", 8),
        ("Netherlands", 10),
    ];
    let goals_by_team = ChartData::single(
        teams.iter().map(|(name, _)| name.to_string()).collect(),
        Dataset {
            label: "Goals Scored".to_string(),
            values: teams.iter().map(|(_, goals)| *goals).collect(),
            colors: ColorScheme {
                fill: vec![PINK_FILL, BLUE_FILL, GOLD_FILL, TEAL_FILL, PURPLE_FILL, ORANGE_FILL],
                border: vec![PINK, BLUE, GOLD, TEAL, PURPLE, ORANGE],
            },
        },
    );
    let card_distribution = ChartData::single(
        vec!["Yellow Cards".to_string(), "Red Cards".to_string()],
        Dataset {
            label: "Cards".to_string(),
            values: vec![u64::from(YELLOW_CARDS), u64::from(RED_CARDS)],
            colors: ColorScheme {
                fill: vec![GOLD_FILL, PINK_FILL],
                border: vec![GOLD, PINK],
            },
        },
    );

    StatsView {
        cards: vec![
            StatCard::new(ICON_GOAL, "Total Goals", TOTAL_GOALS, ACCENT_GREEN)
                .caption("Avg: 2.7 per match"),
            StatCard::new(ICON_FLAG, "Teams", TOTAL_TEAMS, ACCENT_BLUE)
                .caption("From 5 confederations"),
            StatCard::new(ICON_WARNING, "Yellow Cards", YELLOW_CARDS, ACCENT_YELLOW)
                .caption("Avg: 3.4 per match"),
            StatCard::new(ICON_AWARD, "Red Cards", RED_CARDS, ACCENT_RED)
                .caption("Avg: 0.06 per match"),
        ],
        goals_by_team,
        card_distribution,
    }
}
