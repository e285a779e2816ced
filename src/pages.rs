use anyhow::{Context, Result, bail};

use crate::nav::Route;
use crate::query::{QueryClient, SelectQuery, SortDirection};
use crate::rows::{CountryRow, MatchRow, PlayerRow, TopScorerRow, decode_rows};
use crate::view_model::{
    MatchCard, PlayerCard, TeamCard, TopScorer, map_matches, map_players, map_teams,
    map_top_scorers,
};

pub const TOP_SCORER_LIMIT: usize = 5;

const PLAYER_COLUMNS: &str = "
    id,
    name,
    position,
    country:countries(name),
    top_scorers(goals)
";

const MATCH_COLUMNS: &str = "
    id,
    home_team:countries!matches_home_team_id_fkey(name),
    away_team:countries!matches_away_team_id_fkey(name),
    home_score,
    away_score,
    match_date,
    stadium
";

// `!inner` keeps only players that have a scoring record.
const TOP_SCORER_COLUMNS: &str = "
    name,
    country:countries(name),
    top_scorers!inner(goals)
";

/// The single read a page issues when it mounts. Stats has none.
pub fn page_query(route: Route) -> Option<SelectQuery> {
    match route {
        Route::Dashboard => Some(
            SelectQuery::from("players")
                .select(TOP_SCORER_COLUMNS)
                .order("top_scorers(goals)", SortDirection::Descending)
                .limit(TOP_SCORER_LIMIT),
        ),
        Route::Teams => Some(
            SelectQuery::from("countries")
                .select("*")
                .order("fifa_ranking", SortDirection::Ascending),
        ),
        Route::Players => Some(
            SelectQuery::from("players")
                .select(PLAYER_COLUMNS)
                .order("name", SortDirection::Ascending),
        ),
        Route::Matches => Some(
            SelectQuery::from("matches")
                .select(MATCH_COLUMNS)
                .order("match_date", SortDirection::Descending),
        ),
        Route::Stats => None,
    }
}

/// What a page calls the things it lists, for placeholders and log lines.
pub fn page_noun(route: Route) -> &'static str {
    match route {
        Route::Dashboard => "top scorers",
        Route::Teams => "teams",
        Route::Players => "players",
        Route::Matches => "matches",
        Route::Stats => "statistics",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
    TopScorers(Vec<TopScorer>),
    Teams(Vec<TeamCard>),
    Players(Vec<PlayerCard>),
    Matches(Vec<MatchCard>),
}

impl PageData {
    pub fn route(&self) -> Route {
        match self {
            PageData::TopScorers(_) => Route::Dashboard,
            PageData::Teams(_) => Route::Teams,
            PageData::Players(_) => Route::Players,
            PageData::Matches(_) => Route::Matches,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PageData::TopScorers(items) => items.len(),
            PageData::Teams(items) => items.len(),
            PageData::Players(items) => items.len(),
            PageData::Matches(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs a page's query and shapes the rows for display. Row order is kept as
/// the backend returned it.
pub fn load_page(client: &dyn QueryClient, route: Route) -> Result<PageData> {
    let query = page_query(route)
        .with_context(|| format!("{} page has no backing query", route.label()))?;
    let rows = client
        .select(&query)
        .with_context(|| format!("select from {} failed", query.table))?;

    let data = match route {
        Route::Dashboard => {
            PageData::TopScorers(map_top_scorers(decode_rows::<TopScorerRow>(rows)?))
        }
        Route::Teams => PageData::Teams(map_teams(decode_rows::<CountryRow>(rows)?)),
        Route::Players => PageData::Players(map_players(decode_rows::<PlayerRow>(rows)?)),
        Route::Matches => PageData::Matches(map_matches(decode_rows::<MatchRow>(rows)?)),
        Route::Stats => bail!("{} page has no rows to map", route.label()),
    };
    Ok(data)
}
