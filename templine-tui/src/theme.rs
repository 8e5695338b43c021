//! Parrot/neon theme tokens.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, enabled controls, current year)
//! - **Warm**: Hot pink (anomalies above the baseline)
//! - **Cool**: Steel blue (anomalies below the baseline)
//! - **Warning**: Neon orange (loading, alerts)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Gray (disabled controls, hints)

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const WARM: Color = Color::Rgb(255, 20, 147);
pub const COOL: Color = Color::Rgb(100, 149, 237);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(110, 110, 120);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(WARM)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Button style: highlighted when the control is usable.
pub fn control(enabled: bool) -> Style {
    if enabled {
        Style::default()
            .fg(BACKGROUND)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        muted().add_modifier(Modifier::DIM)
    }
}

/// Color for an anomaly value: warm above the baseline, cool below.
pub fn anomaly_color(value: f64) -> Color {
    if value >= 0.0 {
        WARM
    } else {
        COOL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomaly_color_splits_at_baseline() {
        assert_eq!(anomaly_color(0.8), WARM);
        assert_eq!(anomaly_color(0.0), WARM);
        assert_eq!(anomaly_color(-0.3), COOL);
    }

    #[test]
    fn control_style_reflects_enabled() {
        assert_eq!(control(true).bg, Some(ACCENT));
        assert_eq!(control(false).bg, None);
        assert_eq!(control(false).fg, Some(MUTED));
    }

    #[test]
    fn panel_styles() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}
