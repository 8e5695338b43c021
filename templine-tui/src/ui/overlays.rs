//! Help overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme;
use crate::ui::centered_rect;

const KEYS: [(&str, &str); 6] = [
    ("p / Enter", "play from the first year"),
    ("s", "pause"),
    ("space", "toggle play/pause"),
    ("?", "show/hide this help"),
    ("q / Esc", "quit"),
    ("Ctrl-C", "quit"),
];

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help ")
        .title_style(theme::accent_bold());

    let mut text = vec![Line::from("")];
    for (key, what) in KEYS {
        text.push(Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::accent_bold()),
            Span::styled(what, theme::muted()),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Playback spreads the whole series over a fixed duration and stops after the last year.",
        theme::neutral(),
    )));

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}
