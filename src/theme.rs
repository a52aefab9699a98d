//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes; the
//! selected variant is persisted under the `theme` storage key.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Value written to storage and config.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other variant: Light → Dark, Dark → Light.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // -- Feed --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_description: Style,
    pub article_source: Style,
    pub article_date: Style,
    pub message: Style,
    pub error_message: Style,

    // -- Chrome --
    pub header: Style,
    pub header_value: Style,
    pub search_active: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub background: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            article_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            article_description: Style::default(),
            article_source: Style::default().fg(Color::Yellow),
            article_date: Style::default().fg(Color::DarkGray),
            message: Style::default().fg(Color::Gray),
            error_message: Style::default().fg(Color::Red),

            header: Style::default().fg(Color::Gray),
            header_value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            search_active: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::Cyan),
            background: Style::default(),
        }
    }

    fn light() -> Self {
        Self {
            article_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            article_description: Style::default().fg(Color::Black),
            article_source: Style::default().fg(Color::Magenta),
            article_date: Style::default().fg(Color::DarkGray),
            message: Style::default().fg(Color::DarkGray),
            error_message: Style::default().fg(Color::Red),

            header: Style::default().fg(Color::DarkGray),
            header_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            search_active: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::Blue),
            background: Style::default().bg(Color::White).fg(Color::Black),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(
            ThemeVariant::from_str_name(" DARK "),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn toggled_twice_is_identity() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_ne!(variant.toggled(), variant);
            assert_eq!(variant.toggled().toggled(), variant);
        }
    }

    #[test]
    fn as_str_round_trips() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(ThemeVariant::from_str_name(variant.as_str()), Some(variant));
        }
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.article_selected, light.article_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn error_message_is_red_in_both() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(
                variant.palette().error_message,
                Style::default().fg(Color::Red)
            );
        }
    }
}
