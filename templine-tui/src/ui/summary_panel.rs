//! Left column — load state, series summary, preview, current year, controls.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use templine_core::data::LoadStatus;
use templine_core::domain::HistoricalSeries;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = match app.loader.status() {
        LoadStatus::Loading => loading_lines(app),
        LoadStatus::Error(message) => error_lines(message),
        LoadStatus::Ready => match app.data() {
            Some(data) => ready_lines(app, data),
            None => error_lines("series missing after load"),
        },
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn loading_lines(app: &AppState) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled("Loading…", theme::warning())),
        Line::from(""),
        Line::from(Span::styled(app.source.describe(), theme::muted())),
    ]
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::negative())),
        Line::from(""),
        Line::from(Span::styled("Playback disabled.", theme::muted())),
    ]
}

fn ready_lines(app: &AppState, data: &HistoricalSeries) -> Vec<Line<'static>> {
    let meta = &data.meta;
    let mut lines = Vec::new();

    if let Some(dataset) = &meta.dataset {
        lines.push(Line::from(Span::styled(dataset.clone(), theme::neutral())));
    }
    lines.push(field("Baseline", meta.baseline.clone()));
    lines.push(field("Unit", meta.unit.clone()));
    lines.push(field(
        "Years",
        format!("{}–{}", meta.start_year, meta.end_year),
    ));
    lines.push(field("Points", data.len().to_string()));
    lines.push(Line::from(""));

    let preview = data.preview(app.preview_len);
    lines.push(Line::from(Span::styled(
        format!("First {} points", preview.len()),
        theme::accent_bold(),
    )));
    if preview.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", theme::muted())));
    }
    for point in preview {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>6}", point.year), theme::text()),
            Span::styled(
                format!("  {:+.2} {}", point.value, meta.unit),
                Style::default().fg(theme::anomaly_color(point.value)),
            ),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Current year", theme::accent_bold())));
    let current = match app.playback.current_year() {
        Some(year) => {
            let value = app
                .playback
                .current_point()
                .map(|p| format!("  {:+.2} {}", p.value, meta.unit))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("  {year}"), theme::accent_bold()),
                Span::styled(value, theme::muted()),
            ])
        }
        None => Line::from(Span::styled("  —", theme::muted())),
    };
    lines.push(current);
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(" ▶ Play ", theme::control(app.playback.can_play())),
        Span::raw("  "),
        Span::styled(" ⏸ Pause ", theme::control(app.playback.can_pause())),
    ]));

    lines
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<9}"), theme::muted()),
        Span::styled(value, theme::text()),
    ])
}
