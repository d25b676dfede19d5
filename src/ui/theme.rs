//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Badge;
use crate::refresh::Phase;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning badges (medium threats).
    pub warning: Color,
    /// Color for danger badges (high threats, blocked requests).
    pub danger: Color,
    /// Color for success badges (active gateways and requests).
    pub success: Color,
    /// Color for secondary text such as card captions.
    pub muted: Color,
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            muted: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a status badge.
    pub fn badge_style(&self, badge: Badge) -> Style {
        match badge {
            Badge::Success => Style::default().fg(self.success),
            Badge::Warning => Style::default().fg(self.warning),
            Badge::Danger => Style::default().fg(self.danger).add_modifier(Modifier::BOLD),
        }
    }

    /// Style for the refresh phase indicator in the header.
    pub fn phase_style(&self, phase: Phase) -> Style {
        match phase {
            Phase::Loading => Style::default().fg(self.warning),
            Phase::Ready => Style::default().fg(self.success),
            Phase::Errored => Style::default().fg(self.danger).add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_badge_is_bold() {
        let theme = Theme::dark();
        let style = theme.badge_style(Badge::Danger);
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.badge_style(Badge::Success).fg, Some(Color::Green));
    }

    #[test]
    fn test_phase_styles() {
        let theme = Theme::light();
        assert_eq!(theme.phase_style(Phase::Ready).fg, Some(Color::Green));
        assert_eq!(theme.phase_style(Phase::Loading).fg, Some(Color::Yellow));
    }
}
