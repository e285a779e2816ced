use std::collections::VecDeque;

use crate::nav::{self, NavState, Route};
use crate::pages::{PageData, page_noun, page_query};
use crate::view_model::{MatchCard, PlayerCard, TeamCard, TopScorer};

/// Identifies one mount of a page. Every navigation or reload gets a new one.
pub type MountId = u64;

const MAX_LOGS: usize = 200;

/// Per-page state: created empty and loading when the page mounts, filled once
/// the fetch for that mount resolves, dropped when the page unmounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState<T> {
    pub mount: MountId,
    pub loading: bool,
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> PageState<T> {
    pub fn mounted(mount: MountId) -> Self {
        Self {
            mount,
            loading: true,
            items: Vec::new(),
            error: None,
        }
    }

    pub fn finish(&mut self, result: Result<Vec<T>, String>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(err) => {
                self.items.clear();
                self.error = Some(err);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Dashboard(PageState<TopScorer>),
    Teams(PageState<TeamCard>),
    Players(PageState<PlayerCard>),
    Matches(PageState<MatchCard>),
    Stats,
}

impl PageView {
    pub fn mount(route: Route, mount: MountId) -> Self {
        match route {
            Route::Dashboard => PageView::Dashboard(PageState::mounted(mount)),
            Route::Teams => PageView::Teams(PageState::mounted(mount)),
            Route::Players => PageView::Players(PageState::mounted(mount)),
            Route::Matches => PageView::Matches(PageState::mounted(mount)),
            Route::Stats => PageView::Stats,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            PageView::Dashboard(_) => Route::Dashboard,
            PageView::Teams(_) => Route::Teams,
            PageView::Players(_) => Route::Players,
            PageView::Matches(_) => Route::Matches,
            PageView::Stats => Route::Stats,
        }
    }

    /// `None` for pages that never fetch.
    pub fn mount_id(&self) -> Option<MountId> {
        match self {
            PageView::Dashboard(page) => Some(page.mount),
            PageView::Teams(page) => Some(page.mount),
            PageView::Players(page) => Some(page.mount),
            PageView::Matches(page) => Some(page.mount),
            PageView::Stats => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            PageView::Dashboard(page) => page.loading,
            PageView::Teams(page) => page.loading,
            PageView::Players(page) => page.loading,
            PageView::Matches(page) => page.loading,
            PageView::Stats => false,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            PageView::Dashboard(page) => page.items.len(),
            PageView::Teams(page) => page.items.len(),
            PageView::Players(page) => page.items.len(),
            PageView::Matches(page) => page.items.len(),
            PageView::Stats => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageView::Dashboard(page) => page.error.as_deref(),
            PageView::Teams(page) => page.error.as_deref(),
            PageView::Players(page) => page.error.as_deref(),
            PageView::Matches(page) => page.error.as_deref(),
            PageView::Stats => None,
        }
    }

    fn finish(&mut self, result: Result<PageData, String>) {
        match result {
            Ok(data) => match (self, data) {
                (PageView::Dashboard(page), PageData::TopScorers(items)) => page.finish(Ok(items)),
                (PageView::Teams(page), PageData::Teams(items)) => page.finish(Ok(items)),
                (PageView::Players(page), PageData::Players(items)) => page.finish(Ok(items)),
                (PageView::Matches(page), PageData::Matches(items)) => page.finish(Ok(items)),
                (view, data) => {
                    let err = format!(
                        "{} rows for the {} page",
                        page_noun(data.route()),
                        view.route().label()
                    );
                    view.fail(err);
                }
            },
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: String) {
        match self {
            PageView::Dashboard(page) => page.finish(Err(err)),
            PageView::Teams(page) => page.finish(Err(err)),
            PageView::Players(page) => page.finish(Err(err)),
            PageView::Matches(page) => page.finish(Err(err)),
            PageView::Stats => {}
        }
    }
}

/// Sent to the fetch worker when a page mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCommand {
    pub route: Route,
    pub mount: MountId,
}

#[derive(Debug)]
pub enum Delta {
    PageLoaded {
        route: Route,
        mount: MountId,
        result: anyhow::Result<PageData>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Current path; the active nav item is whichever route matches it exactly.
    pub location: String,
    pub nav: NavState,
    pub page: PageView,
    pub scroll: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub log_overlay: bool,
    pub show_fetch_errors: bool,
    pub backend_label: String,
    next_mount: MountId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            location: Route::Dashboard.path().to_string(),
            nav: NavState::default(),
            page: PageView::mount(Route::Dashboard, 0),
            scroll: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            log_overlay: false,
            show_fetch_errors: false,
            backend_label: String::new(),
            next_mount: 1,
        }
    }

    pub fn current_route(&self) -> Route {
        Route::from_path(&self.location).unwrap_or(Route::Dashboard)
    }

    pub fn active_nav_index(&self) -> Option<usize> {
        nav::active_index(&self.location)
    }

    /// Replaces whatever page was showing with a fresh mount of `route`. The
    /// previous page's data goes with it.
    pub fn mount(&mut self, route: Route) -> Option<FetchCommand> {
        let mount = self.next_mount;
        self.next_mount += 1;
        self.location = route.path().to_string();
        self.page = PageView::mount(route, mount);
        self.scroll = 0;
        page_query(route).map(|_| FetchCommand { route, mount })
    }

    /// Link activation. Following the link to the page already showing does
    /// not remount it.
    pub fn navigate(&mut self, route: Route) -> Option<FetchCommand> {
        let route = self.nav.activate(route);
        if route.path() == self.location {
            return None;
        }
        self.mount(route)
    }

    pub fn reload(&mut self) -> Option<FetchCommand> {
        self.mount(self.current_route())
    }

    pub fn scroll_down(&mut self) {
        let max = self.page.item_count().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::PageLoaded {
            route,
            mount,
            result,
        } => {
            // The failure is logged where it happened, even if nobody is
            // looking at that page anymore.
            let result = result
                .and_then(|data| {
                    if data.route() == route {
                        Ok(data)
                    } else {
                        Err(anyhow::anyhow!(
                            "got {} rows instead",
                            page_noun(data.route())
                        ))
                    }
                })
                .map_err(|err| {
                state.push_log(format!("[WARN] Error fetching {}: {err:#}", page_noun(route)));
                format!("{err:#}")
            });
            if state.page.mount_id() != Some(mount) || state.page.route() != route {
                // Result for a page that has since unmounted; discard.
                return;
            }
            if let Ok(data) = &result {
                state.push_log(format!("[INFO] Loaded {} {}", data.len(), page_noun(route)));
            }
            state.page.finish(result);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
