//! Right column — anomaly line chart with the current year marked.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use templine_core::domain::HistoricalSeries;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.data() {
        Some(data) if !data.is_empty() => {
            render_chart(f, area, data, app.playback.current_year());
        }
        _ => render_empty(f, area),
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No series to chart.", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, data: &HistoricalSeries, current: Option<i32>) {
    let (min_v, max_v) = data.value_range().unwrap_or((0.0, 0.0));
    let padding = ((max_v - min_v).abs() * 0.05).max(0.05);
    let y_min = min_v - padding;
    let y_max = max_v + padding;

    let x_min = f64::from(first_year(data));
    let x_max = f64::from(last_year(data)).max(x_min + 1.0);

    // Played part in accent, the rest muted.
    let split_year = current.unwrap_or(i32::MIN);
    let played: Vec<(f64, f64)> = data
        .series
        .iter()
        .filter(|p| p.year <= split_year && p.value.is_finite())
        .map(|p| (f64::from(p.year), p.value))
        .collect();
    let upcoming: Vec<(f64, f64)> = data
        .series
        .iter()
        .filter(|p| p.year >= split_year && p.value.is_finite())
        .map(|p| (f64::from(p.year), p.value))
        .collect();
    let baseline = vec![(x_min, 0.0), (x_max, 0.0)];
    let marker: Vec<(f64, f64)> = current
        .map(|y| vec![(f64::from(y), y_min), (f64::from(y), y_max)])
        .unwrap_or_default();

    let mut datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .style(theme::muted())
            .graph_type(GraphType::Line)
            .data(&baseline),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .style(theme::muted())
            .graph_type(GraphType::Line)
            .data(&upcoming),
        Dataset::default()
            .name(format!("anomaly ({})", data.meta.unit))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::ACCENT))
            .graph_type(GraphType::Line)
            .data(&played),
    ];
    if !marker.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::WARNING))
                .graph_type(GraphType::Line)
                .data(&marker),
        );
    }

    let title = match current {
        Some(year) => format!(" {year} "),
        None => String::new(),
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(theme::muted())
                .title(Span::styled(title, theme::accent_bold())),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("Year", theme::muted()))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(format!("{x_min:.0}"), theme::muted()),
                    Span::styled(format!("{x_max:.0}"), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(data.meta.unit.clone(), theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:+.1}"), theme::muted()),
                    Span::styled(format!("{y_max:+.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn first_year(data: &HistoricalSeries) -> i32 {
    data.series.first().map_or(data.meta.start_year, |p| p.year)
}

fn last_year(data: &HistoricalSeries) -> i32 {
    data.series.last().map_or(data.meta.end_year, |p| p.year)
}
