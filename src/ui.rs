use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::chart::{self, ChartKind, ChartOptions, LegendPosition};
use crate::nav::{self, NAV_BAR_HEIGHT, NavLayout, Route, Viewport, nav_layout};
use crate::pages::page_noun;
use crate::state::{AppState, PageState, PageView};
use crate::view_model::{self, MatchCard, PlayerCard, StatCard, TeamCard};

const STAT_CARD_HEIGHT: u16 = 5;
const TEAM_CARD_HEIGHT: u16 = 4;
const PLAYER_CARD_HEIGHT: u16 = 5;
const MATCH_CARD_HEIGHT: u16 = 5;
const MIN_CHART_HEIGHT: u16 = 8;
const CHART_SPLIT_COLS: u16 = 100;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let state = &app.state;
    let viewport = Viewport::from_width(area.width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAV_BAR_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let layout = nav_layout(area, viewport, state.nav.is_menu_open());
    render_nav_bar(frame, &layout, state);
    render_page(frame, chunks[1], state, viewport);
    render_footer(frame, chunks[2], state);

    // Drawn after the page so it sits on top of it.
    if let Some(dropdown) = layout.dropdown {
        render_dropdown(frame, dropdown, &layout, state);
    }
    if state.log_overlay {
        render_log_overlay(frame, area, state);
    }
    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

/// Columns for a card grid of up to `max` columns at this width.
pub fn grid_columns(width: u16, max: u16) -> u16 {
    let cols = if width < 60 {
        1
    } else if width < 100 {
        2
    } else {
        max
    };
    cols.clamp(1, max.max(1))
}

fn render_nav_bar(frame: &mut Frame, layout: &NavLayout, state: &AppState) {
    let bar = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, layout.bar);

    let title = Paragraph::new(nav::title_text()).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, layout.title);

    if layout.dropdown.is_none() {
        for hitbox in &layout.links {
            let active = state.active_nav_index() == Some(hitbox.route.index());
            let link = Paragraph::new(format!(" {} ", nav::link_text(hitbox.route)))
                .style(link_style(active, false));
            frame.render_widget(link, hitbox.area);
        }
    }

    if let Some(button) = layout.menu_button {
        let glyph = if state.nav.is_menu_open() { " ✕ " } else { " ≡ " };
        let button_widget = Paragraph::new(glyph).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(button_widget, button);
    }
}

fn render_dropdown(frame: &mut Frame, area: Rect, layout: &NavLayout, state: &AppState) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(block, area);
    for hitbox in &layout.links {
        let active = state.active_nav_index() == Some(hitbox.route.index());
        let link = Paragraph::new(nav::link_text(hitbox.route)).style(link_style(active, true));
        frame.render_widget(link, hitbox.area);
    }
}

fn link_style(active: bool, stacked: bool) -> Style {
    match (active, stacked) {
        (false, _) => Style::default().fg(Color::Gray),
        (true, false) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        (true, true) => Style::default()
            .fg(Color::Yellow)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    }
}

fn page_heading(route: Route) -> (&'static str, &'static str) {
    match route {
        Route::Dashboard => (
            "World Cup Dashboard",
            "Real-time statistics and analysis from Qatar 2022",
        ),
        Route::Teams => (
            "National Teams",
            "All participating teams in the World Cup 2022",
        ),
        Route::Players => ("Players", "All players participating in the World Cup 2022"),
        Route::Matches => ("Matches", "All matches from the World Cup 2022"),
        Route::Stats => (
            "Tournament Statistics",
            "Comprehensive statistics from the World Cup 2022",
        ),
    }
}

fn render_page(frame: &mut Frame, area: Rect, state: &AppState, viewport: Viewport) {
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let (title, subtitle) = page_heading(state.page.route());
    let heading = Paragraph::new(vec![
        Line::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(heading, sections[0]);

    let body = sections[1];
    let options = chart_options(viewport);
    match &state.page {
        PageView::Dashboard(page) => render_dashboard(frame, body, page, state, &options),
        PageView::Teams(page) => {
            render_card_list(frame, body, page, state, 3, TEAM_CARD_HEIGHT, render_team_card)
        }
        PageView::Players(page) => {
            render_card_list(frame, body, page, state, 3, PLAYER_CARD_HEIGHT, render_player_card)
        }
        PageView::Matches(page) => {
            render_card_list(frame, body, page, state, 1, MATCH_CARD_HEIGHT, render_match_card)
        }
        PageView::Stats => render_stats(frame, body, &options),
    }
}

fn chart_options(viewport: Viewport) -> ChartOptions {
    let mut options = ChartOptions::dark_theme();
    if viewport == Viewport::Mobile {
        options.legend_position = LegendPosition::Bottom;
    }
    options
}

fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    page: &PageState<view_model::TopScorer>,
    state: &AppState,
    options: &ChartOptions,
) {
    let scorers = (!page.loading).then_some(page.items.as_slice());
    let view = view_model::dashboard_view(scorers);
    let charts = render_stat_cards(frame, area, &view.cards);
    let [left, right] = chart_slots(charts);

    if page.loading || page.items.is_empty() {
        render_message(frame, left, &page_message(Route::Dashboard, page, state));
    } else {
        chart::render_chart(
            frame,
            left,
            "Top Scorers",
            ChartKind::Bar,
            &view.top_scorers,
            options,
        );
    }
    chart::render_chart(
        frame,
        right,
        "Goals Timeline",
        ChartKind::Line,
        &view.goals_timeline,
        options,
    );
}

fn render_stats(frame: &mut Frame, area: Rect, options: &ChartOptions) {
    let view = view_model::stats_view();
    let charts = render_stat_cards(frame, area, &view.cards);
    let [left, right] = chart_slots(charts);
    chart::render_chart(
        frame,
        left,
        "Goals by Team",
        ChartKind::Bar,
        &view.goals_by_team,
        options,
    );
    chart::render_chart(
        frame,
        right,
        "Card Distribution",
        ChartKind::Doughnut,
        &view.card_distribution,
        options,
    );
}

/// Draws the stat card grid at the top of `area` and returns what is left.
fn render_stat_cards(frame: &mut Frame, area: Rect, cards: &[StatCard]) -> Rect {
    let columns = grid_columns(area.width, 4);
    let rows = (cards.len() as u16).div_ceil(columns);
    let height = (rows * STAT_CARD_HEIGHT).min(area.height);
    let grid_area = Rect { height, ..area };
    for (card, cell) in cards.iter().zip(grid_cells(grid_area, columns, STAT_CARD_HEIGHT)) {
        render_stat_card(frame, cell, card);
    }
    Rect {
        y: area.y + height,
        height: area.height - height,
        ..area
    }
}

fn render_stat_card(frame: &mut Frame, area: Rect, card: &StatCard) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(card.icon, Style::default().fg(card.accent.to_color())),
            Span::raw("  "),
            Span::styled(card.label, Style::default().fg(Color::Gray)),
        ]),
        Line::styled(
            card.value.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(caption) = card.caption {
        lines.push(Line::styled(caption, Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(lines).block(card_block()), area);
}

/// Side by side when wide enough, stacked otherwise.
fn chart_slots(area: Rect) -> [Rect; 2] {
    let direction = if area.width >= CHART_SPLIT_COLS {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let split = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let stacked_too_short = direction == Direction::Vertical && split[0].height < MIN_CHART_HEIGHT;
    if stacked_too_short {
        // Not enough room for two; the first chart gets all of it.
        return [area, Rect { height: 0, ..area }];
    }
    [split[0], split[1]]
}

fn render_card_list<T>(
    frame: &mut Frame,
    area: Rect,
    page: &PageState<T>,
    state: &AppState,
    max_columns: u16,
    card_height: u16,
    render_card: fn(&mut Frame, Rect, &T),
) {
    let route = state.page.route();
    if page.loading || page.items.is_empty() {
        render_message(frame, area, &page_message(route, page, state));
        return;
    }

    let columns = grid_columns(area.width, max_columns);
    let first_row = state.scroll / usize::from(columns);
    let first = first_row * usize::from(columns);
    let cells = grid_cells(area, columns, card_height);
    for (item, cell) in page.items.iter().skip(first).zip(cells) {
        render_card(frame, cell, item);
    }
}

fn page_message<T>(route: Route, page: &PageState<T>, state: &AppState) -> String {
    let noun = page_noun(route);
    if page.loading {
        format!("Loading {noun}...")
    } else if state.show_fetch_errors && page.error.is_some() {
        format!("Could not load {noun}")
    } else {
        format!("No {noun} found")
    }
}

fn render_message(frame: &mut Frame, area: Rect, text: &str) {
    if area.height == 0 {
        return;
    }
    let style = if text.starts_with("Could not") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    let message = Paragraph::new(text.to_string())
        .style(style)
        .alignment(Alignment::Center);
    let line = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(message, line);
}

/// Row-major cells of `height` rows each, as many as fit in `area`.
fn grid_cells(area: Rect, columns: u16, height: u16) -> Vec<Rect> {
    let columns = columns.max(1);
    let mut cells = Vec::new();
    let mut y = area.y;
    while height > 0 && y + height <= area.y + area.height {
        let row = Rect {
            y,
            height,
            ..area
        };
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, u32::from(columns)); usize::from(columns)])
            .split(row);
        cells.extend(split.iter().copied());
        y += height;
    }
    cells
}

fn card_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_team_card(frame: &mut Frame, area: Rect, team: &TeamCard) {
    let lines = vec![
        Line::from(vec![
            Span::styled("⚑ ", Style::default().fg(Color::LightBlue)),
            Span::styled(
                team.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                match team.fifa_ranking {
                    Some(rank) => format!("Rank #{rank}"),
                    None => "Unranked".to_string(),
                },
                Style::default().fg(Color::Gray),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(card_block()), area);
}

fn render_player_card(frame: &mut Frame, area: Rect, player: &PlayerCard) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("☺ ", Style::default().fg(Color::LightBlue)),
            Span::styled(player.name.clone(), value),
        ]),
        Line::styled(player.country.clone(), label),
        Line::from(vec![
            Span::styled("Position ", label),
            Span::styled(player.position.clone(), value),
            Span::styled("  Goals ", label),
            Span::styled(player.goals.to_string(), value),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(card_block())
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_match_card(frame: &mut Frame, area: Rect, card: &MatchCard) {
    let team = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![
            Span::styled(card.home_team.clone(), team),
            Span::raw("  "),
            Span::styled(score_label(card.home_score), team),
            Span::styled(" vs ", muted),
            Span::styled(score_label(card.away_score), team),
            Span::raw("  "),
            Span::styled(card.away_team.clone(), team),
        ]),
        Line::styled(format!("◷ {}", card.date_label), muted),
        Line::styled(format!("⌖ {}", card.stadium), muted),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(card_block())
            .alignment(Alignment::Center),
        area,
    );
}

fn score_label(score: Option<u32>) -> String {
    score.map_or_else(|| "–".to_string(), |goals| goals.to_string())
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        "1-5 Pages | Tab Next | m Menu | r Reload | j/k Scroll | L Log | ? Help | q Quit",
        Style::default().fg(Color::DarkGray),
    )];
    if !state.backend_label.is_empty() {
        spans.push(Span::styled(
            format!(" | {}", state.backend_label),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(last) = state.logs.back() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(last.clone(), log_style(last)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn log_style(line: &str) -> Style {
    if line.starts_with("[WARN]") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_log_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(80, 70, area);
    frame.render_widget(Clear, popup_area);
    let visible = usize::from(popup_area.height.saturating_sub(2));
    let skip = state.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .logs
        .iter()
        .skip(skip)
        .map(|line| Line::styled(line.clone(), log_style(line)))
        .collect();
    let log = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
    frame.render_widget(log, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "TSN World Cup - Help",
        "",
        "Pages:",
        "  1            Dashboard",
        "  2            Teams",
        "  3            Players",
        "  4            Matches",
        "  5            Statistics",
        "  Tab / S-Tab  Next / previous page",
        "  click        Follow a nav link",
        "",
        "Global:",
        "  m            Toggle menu (narrow terminals)",
        "  r            Reload page",
        "  j/k or ↑/↓   Scroll",
        "  L            Toggle log",
        "  ?            Toggle help",
        "  Esc          Close overlays",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
