//! Theme system for the console UI.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Persisted theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    pub fn toggled(self) -> Self {
        match self {
            ThemeVariant::Light => ThemeVariant::Dark,
            ThemeVariant::Dark => ThemeVariant::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }
}

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ColorScheme,
    pub styles: StyleScheme,
}

/// Color scheme for the theme
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub background: Color,
    pub foreground: Color,
    pub primary: Color,
    pub accent: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub muted: Color,
    pub border: Color,
}

/// Style scheme for different UI elements
#[derive(Debug, Clone)]
pub struct StyleScheme {
    pub base: Style,
    pub header: Style,
    pub title: Style,
    pub border: Style,
    pub timestamp: Style,
    pub value: Style,
    pub label: Style,
    pub error: Style,
    pub warning: Style,
    pub success: Style,
    pub muted: Style,
}

impl Theme {
    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Default dark theme
    pub fn dark() -> Self {
        let colors = ColorScheme {
            background: Color::Black,
            foreground: Color::White,
            primary: Color::Cyan,
            accent: Color::Magenta,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
            muted: Color::DarkGray,
            border: Color::Gray,
        };
        let styles = StyleScheme::from_colors(&colors);
        Self {
            name: "Dark".to_string(),
            colors,
            styles,
        }
    }

    /// Default light theme
    pub fn light() -> Self {
        let colors = ColorScheme {
            background: Color::White,
            foreground: Color::Black,
            primary: Color::Blue,
            accent: Color::Magenta,
            error: Color::Red,
            warning: Color::Rgb(180, 120, 0),
            success: Color::Rgb(0, 128, 0),
            muted: Color::Gray,
            border: Color::DarkGray,
        };
        let styles = StyleScheme::from_colors(&colors);
        Self {
            name: "Light".to_string(),
            colors,
            styles,
        }
    }

    /// Style for a quota-usage severity level
    pub fn severity_style(&self, severity: crate::ui::views::UsageSeverity) -> Style {
        use crate::ui::views::UsageSeverity;
        match severity {
            UsageSeverity::Danger => self.styles.error,
            UsageSeverity::Warning => self.styles.warning,
            UsageSeverity::Normal => self.styles.success,
        }
    }
}

impl StyleScheme {
    fn from_colors(colors: &ColorScheme) -> Self {
        Self {
            base: Style::default()
                .fg(colors.foreground)
                .bg(colors.background),
            header: Style::default()
                .fg(colors.primary)
                .add_modifier(Modifier::BOLD),
            title: Style::default()
                .fg(colors.foreground)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(colors.border),
            timestamp: Style::default().fg(colors.muted),
            value: Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(colors.muted),
            error: Style::default().fg(colors.error),
            warning: Style::default().fg(colors.warning),
            success: Style::default().fg(colors.success),
            muted: Style::default().fg(colors.muted),
        }
    }
}
