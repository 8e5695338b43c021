//! Bottom status bar — key hints, load status, last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use templine_core::data::LoadStatus;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " p:Play s:Pause space:Toggle ?:Help q:Quit",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));

    let status = app.loader.status();
    let status_style = match status {
        LoadStatus::Loading => theme::warning(),
        LoadStatus::Error(_) => theme::negative(),
        LoadStatus::Ready => theme::positive(),
    };
    spans.push(Span::styled(status.label(), status_style));

    if let Some(at) = app.loaded_at {
        spans.push(Span::styled(
            format!(" {}", at.format("%H:%M:%S")),
            theme::muted(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
