use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset as LineDataset,
    GraphType, Paragraph,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Rgba {
    Rgba { r, g, b, a }
}

impl Rgba {
    /// Terminal cells have no alpha channel, so translucent colors are blended
    /// over the dark background.
    pub fn to_color(self) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        let blend = |c: u8| (c as f32 * a).round() as u8;
        Color::Rgb(blend(self.r), blend(self.g), blend(self.b))
    }
}

pub const WHITE: Rgba = rgba(255, 255, 255, 1.0);
pub const GRIDLINE: Rgba = rgba(255, 255, 255, 0.1);
pub const GOLD_FILL: Rgba = rgba(255, 206, 86, 0.5);
pub const GOLD: Rgba = rgba(255, 206, 86, 1.0);
pub const TEAL_FILL: Rgba = rgba(75, 192, 192, 0.2);
pub const TEAL: Rgba = rgba(75, 192, 192, 1.0);
pub const PINK_FILL: Rgba = rgba(255, 99, 132, 0.5);
pub const PINK: Rgba = rgba(255, 99, 132, 1.0);
pub const BLUE_FILL: Rgba = rgba(54, 162, 235, 0.5);
pub const BLUE: Rgba = rgba(54, 162, 235, 1.0);
pub const PURPLE_FILL: Rgba = rgba(153, 102, 255, 0.5);
pub const PURPLE: Rgba = rgba(153, 102, 255, 1.0);
pub const ORANGE_FILL: Rgba = rgba(255, 159, 64, 0.5);
pub const ORANGE: Rgba = rgba(255, 159, 64, 1.0);

/// Per-point colors. A scheme shorter than the dataset repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub fill: Vec<Rgba>,
    pub border: Vec<Rgba>,
}

impl ColorScheme {
    pub fn single(fill: Rgba, border: Rgba) -> Self {
        Self {
            fill: vec![fill],
            border: vec![border],
        }
    }

    pub fn fill_at(&self, idx: usize) -> Rgba {
        pick(&self.fill, idx)
    }

    pub fn border_at(&self, idx: usize) -> Rgba {
        pick(&self.border, idx)
    }
}

fn pick(colors: &[Rgba], idx: usize) -> Rgba {
    if colors.is_empty() {
        WHITE
    } else {
        colors[idx % colors.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<u64>,
    pub colors: ColorScheme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn single(labels: Vec<String>, dataset: Dataset) -> Self {
        Self {
            labels,
            datasets: vec![dataset],
        }
    }

    /// Number of plotted points in the primary dataset.
    pub fn len(&self) -> usize {
        self.datasets.first().map(|d| d.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first_value(&self) -> Option<u64> {
        self.datasets.first().and_then(|d| d.values.first().copied())
    }

    fn min_value(&self) -> u64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .min()
            .unwrap_or(0)
    }

    fn max_value(&self) -> u64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub responsive: bool,
    pub legend_position: LegendPosition,
    pub tick_color: Rgba,
    pub grid_color: Rgba,
    pub begin_at_zero: bool,
}

impl ChartOptions {
    /// The look every chart shares: no fill behind the plot, white ticks and
    /// legend, faint gridlines.
    pub fn dark_theme() -> Self {
        Self {
            responsive: true,
            legend_position: LegendPosition::Top,
            tick_color: WHITE,
            grid_color: GRIDLINE,
            begin_at_zero: true,
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::dark_theme()
    }
}

pub fn render_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    kind: ChartKind,
    data: &ChartData,
    options: &ChartOptions,
) {
    let tick = Style::default().fg(options.tick_color.to_color());
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            tick.add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 4 || inner.height < 3 {
        return;
    }

    let legend_row = Constraint::Length(1);
    let (legend_area, plot_area) = match options.legend_position {
        LegendPosition::Top => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([legend_row, Constraint::Min(1)])
                .split(inner);
            (rows[0], rows[1])
        }
        LegendPosition::Bottom => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), legend_row])
                .split(inner);
            (rows[1], rows[0])
        }
    };
    frame.render_widget(Paragraph::new(legend_line(kind, data, options)), legend_area);

    if data.is_empty() {
        let empty = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, plot_area);
        return;
    }

    match kind {
        ChartKind::Bar => render_bars(frame, plot_area, data, options),
        ChartKind::Line => render_line(frame, plot_area, data, options),
        ChartKind::Doughnut => render_shares(frame, plot_area, data, options),
    }
}

fn legend_line(kind: ChartKind, data: &ChartData, options: &ChartOptions) -> Line<'static> {
    let text = Style::default().fg(options.tick_color.to_color());
    let mut spans = Vec::new();
    match kind {
        // A doughnut legend names the slices, not the dataset.
        ChartKind::Doughnut => {
            if let Some(dataset) = data.datasets.first() {
                for (idx, label) in data.labels.iter().enumerate() {
                    let swatch = swatch_style(&dataset.colors, idx);
                    spans.push(Span::styled("■", swatch));
                    spans.push(Span::styled(format!(" {label}  "), text));
                }
            }
        }
        ChartKind::Bar | ChartKind::Line => {
            for dataset in &data.datasets {
                let swatch = swatch_style(&dataset.colors, 0);
                spans.push(Span::styled("■", swatch));
                spans.push(Span::styled(format!(" {}  ", dataset.label), text));
            }
        }
    }
    Line::from(spans)
}

fn swatch_style(colors: &ColorScheme, idx: usize) -> Style {
    Style::default()
        .fg(colors.border_at(idx).to_color())
        .bg(colors.fill_at(idx).to_color())
}

fn render_bars(frame: &mut Frame, area: Rect, data: &ChartData, options: &ChartOptions) {
    let Some(dataset) = data.datasets.first() else {
        return;
    };
    let tick = Style::default().fg(options.tick_color.to_color());
    let bars: Vec<Bar> = dataset
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let label = data.labels.get(idx).cloned().unwrap_or_default();
            Bar::default()
                .value(*value)
                .label(Line::from(short_label(&label, bar_width(area, data, options) as usize)))
                .style(Style::default().fg(dataset.colors.border_at(idx).to_color()))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(dataset.colors.border_at(idx).to_color()),
                )
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area, data, options))
        .bar_gap(1)
        .label_style(tick);
    frame.render_widget(chart, area);
}

fn bar_width(area: Rect, data: &ChartData, options: &ChartOptions) -> u16 {
    const FIXED_WIDTH: u16 = 5;
    if !options.responsive {
        return FIXED_WIDTH;
    }
    let count = data.len().max(1) as u16;
    (area.width / count).saturating_sub(1).clamp(1, 12)
}

fn short_label(label: &str, width: usize) -> String {
    if width == 0 || label.chars().count() <= width {
        return label.to_string();
    }
    // Prefer the surname for people; fall back to a hard cut.
    let last = label.rsplit(' ').next().unwrap_or(label);
    if last.chars().count() <= width {
        return last.to_string();
    }
    last.chars().take(width).collect()
}

fn render_line(frame: &mut Frame, area: Rect, data: &ChartData, options: &ChartOptions) {
    let tick = Style::default().fg(options.tick_color.to_color());
    let grid = Style::default().fg(options.grid_color.to_color());

    let series: Vec<Vec<(f64, f64)>> = data
        .datasets
        .iter()
        .map(|d| {
            d.values
                .iter()
                .enumerate()
                .map(|(x, y)| (x as f64, *y as f64))
                .collect()
        })
        .collect();
    let datasets: Vec<LineDataset> = data
        .datasets
        .iter()
        .zip(series.iter())
        .map(|(d, points)| {
            LineDataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(d.colors.border_at(0).to_color()))
                .data(points)
        })
        .collect();

    let max = data.max_value() as f64;
    let y_top = (max * 1.1).ceil().max(1.0);
    let y_bottom = if options.begin_at_zero {
        0.0
    } else {
        data.min_value() as f64
    };
    let x_labels: Vec<Span> = data
        .labels
        .iter()
        .map(|l| Span::styled(short_label(l, 12), tick))
        .collect();
    let y_labels = vec![
        Span::styled(format!("{y_bottom:.0}"), tick),
        Span::styled(format!("{:.0}", y_top / 2.0), tick),
        Span::styled(format!("{y_top:.0}"), tick),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(grid)
                .bounds([0.0, (data.len().saturating_sub(1)).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(grid)
                .bounds([y_bottom, y_top])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

/// Doughnut data drawn as one horizontal bar per slice, labelled with its share.
fn render_shares(frame: &mut Frame, area: Rect, data: &ChartData, options: &ChartOptions) {
    let Some(dataset) = data.datasets.first() else {
        return;
    };
    let total: u64 = dataset.values.iter().sum();
    let bars: Vec<Bar> = dataset
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let label = data.labels.get(idx).cloned().unwrap_or_default();
            Bar::default()
                .value(*value)
                .label(Line::from(label))
                .text_value(format!("{value} ({})", share_label(*value, total)))
                .style(Style::default().fg(dataset.colors.border_at(idx).to_color()))
                .value_style(Style::default().fg(options.tick_color.to_color()))
        })
        .collect();
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .label_style(Style::default().fg(options.tick_color.to_color()));
    frame.render_widget(chart, area);
}

pub fn share_label(value: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", value as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_white_blends_to_dark_grey() {
        assert_eq!(GRIDLINE.to_color(), Color::Rgb(26, 26, 26));
        assert_eq!(WHITE.to_color(), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn share_label_handles_empty_total() {
        assert_eq!(share_label(219, 223), "98.2%");
        assert_eq!(share_label(4, 0), "0.0%");
    }

    #[test]
    fn short_label_prefers_surname() {
        assert_eq!(short_label("Kylian Mbappé", 7), "Mbappé");
        assert_eq!(short_label("Messi", 7), "Messi");
        assert_eq!(short_label("Emiliano Martínez", 4), "Mart");
    }
}
