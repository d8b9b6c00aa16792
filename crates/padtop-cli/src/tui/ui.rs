//! Dashboard rendering.
//!
//! ┌───────────────────────────────────────────────────────────┐
//! │  padtop   watching: http://127.0.0.1:30000   #42          │
//! ├───────────────────────────────┬───────────────────────────┤
//! │ ╭ Running requests  4 reqs ╮  │  System Info              │
//! │ │        ⣀⡠⠤⠒⠉⠉⠒⠤⣀         │  │  model_path  llama-3-8b  │
//! │ ╰──────────────────────────╯  │  tp_size     2            │
//! │ ╭ Waiting requests  0 reqs ╮  │  chat_template  n/a       │
//! │ │  ⠉⠒⠤⣀⣀⣀⣀⡠⠤⠒⠉             │  │  ...                      │
//! │ ╰──────────────────────────╯  │                           │
//! ├───────────────────────────────┴───────────────────────────┤
//! │  q: quit   p: pause   i: refresh info                     │
//! └───────────────────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use padtop_core::epoch_seconds;

use super::app::{App, ChartView, FrameSnapshot};

/// Deterministic per-chart palette, indexed by catalog position.
const CHART_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

pub fn chart_color(index: usize) -> Color {
    CHART_COLORS[index % CHART_COLORS.len()]
}

/// Zero-based Y range so magnitude comparisons stay honest across updates.
pub fn y_bounds(max_value: f64) -> (f64, f64) {
    if max_value <= 0.0 {
        (0.0, 1.0)
    } else {
        (0.0, max_value * 1.1)
    }
}

/// Relative age label for the X axis.
pub fn format_age(seconds: f64) -> String {
    if seconds < 1.0 {
        "now".to_string()
    } else {
        format!("-{seconds:.0}s")
    }
}

/// Compact value formatting for titles and axis labels.
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else if value.abs() >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

pub fn draw(f: &mut Frame, app: &App, snapshot: &FrameSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(12),   // charts + info panel
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app, snapshot);
    draw_main(f, rows[1], snapshot);
    draw_keys(f, rows[2]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App, snapshot: &FrameSnapshot) {
    let pause_marker = if snapshot.paused { "  paused" } else { "" };

    let mut title = vec![
        Span::styled(" padtop ", Style::default().bold().fg(Color::Cyan)),
        Span::raw("  watching: "),
        Span::styled(app.base_url().to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("  #{}{pause_marker} ", snapshot.cycle_count),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(err) = snapshot
        .last_scrape_error
        .as_deref()
        .or(snapshot.last_info_error.as_deref())
    {
        title.push(Span::styled(
            format!(" {err} "),
            Style::default().fg(Color::Red),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(title));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, snapshot: &FrameSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    draw_charts(f, cols[0], snapshot);
    draw_info(f, cols[1], snapshot);
}

fn draw_charts(f: &mut Frame, area: Rect, snapshot: &FrameSnapshot) {
    let per_row = 2;
    let row_count = snapshot.charts.len().div_ceil(per_row).max(1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(area);

    for (row_idx, chunk) in snapshot.charts.chunks(per_row).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(rows[row_idx]);

        for (col_idx, view) in chunk.iter().enumerate() {
            let chart_idx = row_idx * per_row + col_idx;
            draw_chart(f, cols[col_idx], view, chart_color(chart_idx));
        }
    }
}

fn draw_chart(f: &mut Frame, area: Rect, view: &ChartView, color: Color) {
    let label = view.info.label;

    if view.points.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} "));
        let placeholder = Paragraph::new("waiting for samples")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let latest = view.points.last().map(|p| p.1).unwrap_or(0.0);
    let max_value = view.points.iter().map(|p| p.1).fold(f64::MIN, f64::max);
    let (y_min, y_max) = y_bounds(max_value);

    let x_max = view.points.last().map(|p| p.0).unwrap_or(0.0);
    let mut x_min = view.points.first().map(|p| p.0).unwrap_or(0.0);
    if x_max - x_min < 1.0 {
        // A single point still needs a non-degenerate axis.
        x_min = x_max - 1.0;
    }

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&view.points),
    ];

    let now = epoch_seconds();
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {label}  {} {} ",
            format_value(latest),
            view.info.unit
        )))
        .x_axis(Axis::default().bounds([x_min, x_max]).labels(vec![
            Line::from(format_age(now - x_min)),
            Line::from(format_age(now - x_max)),
        ]))
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
            Line::from("0"),
            Line::from(format_value(y_max)),
        ]));

    f.render_widget(chart, area);
}

fn draw_info(f: &mut Frame, area: Rect, snapshot: &FrameSnapshot) {
    // A failed refresh keeps the previous rows on screen; only the title
    // marks the snapshot as stale.
    let title = if snapshot.last_info_error.is_some() {
        " System Info (stale) "
    } else {
        " System Info "
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(info) = &snapshot.system_info else {
        let placeholder = Paragraph::new("no snapshot yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    let rows: Vec<Row> = info
        .rows()
        .map(|(property, value)| {
            let height = value.lines().count().clamp(1, 6) as u16;
            Row::new(vec![
                Cell::from(property.to_string()),
                Cell::from(Text::from(value)),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(40), Constraint::Percentage(60)],
    )
    .block(block);

    f.render_widget(table, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(" q: quit   p: pause   i: refresh info")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
