use ratatui::layout::Rect;

pub const APP_TITLE: &str = "TSN World Cup";

/// Terminals narrower than this get the collapsed (menu button) navigation.
pub const MOBILE_BREAKPOINT_COLS: u16 = 80;

pub const NAV_BAR_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Teams,
    Players,
    Matches,
    Stats,
}

/// Navigation order. Also the order of the `1`..`5` shortcuts.
pub const ROUTES: [Route; 5] = [
    Route::Dashboard,
    Route::Teams,
    Route::Players,
    Route::Matches,
    Route::Stats,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Teams => "/teams",
            Route::Players => "/players",
            Route::Matches => "/matches",
            Route::Stats => "/stats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Teams => "Teams",
            Route::Players => "Players",
            Route::Matches => "Matches",
            Route::Stats => "Statistics",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Route::Dashboard => "♛",
            Route::Teams => "⚑",
            Route::Players => "☺",
            Route::Matches => "◷",
            Route::Stats => "▤",
        }
    }

    /// Exact match only; `/teams/` or `/Teams` are not routes.
    pub fn from_path(path: &str) -> Option<Route> {
        ROUTES.into_iter().find(|r| r.path() == path)
    }

    pub fn index(self) -> usize {
        ROUTES.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> Route {
        ROUTES[(self.index() + 1) % ROUTES.len()]
    }

    pub fn prev(self) -> Route {
        ROUTES[(self.index() + ROUTES.len() - 1) % ROUTES.len()]
    }

    pub fn from_shortcut(ch: char) -> Option<Route> {
        let digit = ch.to_digit(10)? as usize;
        digit.checked_sub(1).and_then(|idx| ROUTES.get(idx).copied())
    }
}

pub fn active_index(path: &str) -> Option<usize> {
    ROUTES.iter().position(|r| r.path() == path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Mobile,
    Desktop,
}

impl Viewport {
    pub fn from_width(width: u16) -> Viewport {
        if width < MOBILE_BREAKPOINT_COLS {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    mobile_menu_open: bool,
}

impl NavState {
    pub fn is_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    pub fn close_menu(&mut self) {
        self.mobile_menu_open = false;
    }

    /// Following any link closes the mobile menu.
    pub fn activate(&mut self, route: Route) -> Route {
        self.mobile_menu_open = false;
        route
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavHitbox {
    pub route: Route,
    pub area: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavClick {
    Link(Route),
    MenuButton,
    Outside,
}

/// Where the nav bar puts things. Drawing and mouse hit-testing both use this,
/// so a click lands on exactly what was drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLayout {
    pub bar: Rect,
    pub title: Rect,
    pub menu_button: Option<Rect>,
    pub dropdown: Option<Rect>,
    pub links: Vec<NavHitbox>,
}

pub fn title_text() -> String {
    format!("{} {APP_TITLE}", Route::Dashboard.icon())
}

pub fn link_text(route: Route) -> String {
    format!("{} {}", route.icon(), route.label())
}

pub fn nav_layout(frame_area: Rect, viewport: Viewport, menu_open: bool) -> NavLayout {
    let bar = Rect {
        height: NAV_BAR_HEIGHT.min(frame_area.height),
        ..frame_area
    };
    let title_width = (title_text().chars().count() as u16).min(bar.width.saturating_sub(1));
    let title = Rect {
        x: bar.x.saturating_add(1),
        y: bar.y + u16::from(bar.height > 1),
        width: title_width,
        height: bar.height.min(1),
    };

    match viewport {
        Viewport::Desktop => {
            let mut links = Vec::with_capacity(ROUTES.len());
            let mut x = title.x + title.width + 2;
            for route in ROUTES {
                let width = link_text(route).chars().count() as u16 + 2;
                if x + width > bar.x + bar.width {
                    break;
                }
                links.push(NavHitbox {
                    route,
                    area: Rect {
                        x,
                        y: title.y,
                        width,
                        height: 1,
                    },
                });
                x += width + 1;
            }
            NavLayout {
                bar,
                title,
                menu_button: None,
                dropdown: None,
                links,
            }
        }
        Viewport::Mobile => {
            const BUTTON_WIDTH: u16 = 3;
            let menu_button = (bar.width > BUTTON_WIDTH + 1).then(|| Rect {
                x: bar.x + bar.width - BUTTON_WIDTH - 1,
                y: title.y,
                width: BUTTON_WIDTH,
                height: 1,
            });
            let mut links = Vec::new();
            let mut dropdown = None;
            let below = frame_area.height.saturating_sub(bar.height);
            if menu_open && below >= 3 {
                let height = (ROUTES.len() as u16 + 2).min(below);
                let area = Rect {
                    x: frame_area.x,
                    y: bar.y + bar.height,
                    width: frame_area.width,
                    height,
                };
                for (idx, route) in ROUTES.into_iter().enumerate() {
                    let y = area.y + 1 + idx as u16;
                    if y >= area.y + area.height - 1 {
                        break;
                    }
                    links.push(NavHitbox {
                        route,
                        area: Rect {
                            x: area.x + 1,
                            y,
                            width: area.width.saturating_sub(2),
                            height: 1,
                        },
                    });
                }
                dropdown = Some(area);
            }
            NavLayout {
                bar,
                title,
                menu_button,
                dropdown,
                links,
            }
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

impl NavLayout {
    pub fn hit(&self, x: u16, y: u16) -> NavClick {
        if let Some(hitbox) = self.links.iter().find(|h| contains(h.area, x, y)) {
            return NavClick::Link(hitbox.route);
        }
        if contains(self.title, x, y) {
            return NavClick::Link(Route::Dashboard);
        }
        if self.menu_button.is_some_and(|b| contains(b, x, y)) {
            return NavClick::MenuButton;
        }
        NavClick::Outside
    }
}
