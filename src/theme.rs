//! Theme configuration and colors.
//!
//! Terminal previews are styled from the palettes in the `ratatui-themes`
//! crate; the selected theme is stored in the config file.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Get the display name for the theme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the color palette for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Colors used by the post previews.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Card background
    pub bg_card: Color,
    /// Primary foreground/text color
    pub fg: Color,
    /// Muted text color (timestamps, handles)
    pub fg_muted: Color,
    /// Accent color (author names)
    pub primary: Color,
    /// Secondary accent (media indicator)
    pub secondary: Color,
    /// Card border
    pub border: Color,
}

impl ThemeColors {
    /// Create `ThemeColors` from a `ThemePalette`
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg_card: Self::adjust_brightness(p.bg, 10),
            fg: p.fg,
            fg_muted: p.muted,
            primary: p.accent,
            secondary: p.secondary,
            border: p.muted,
        }
    }

    /// Lighten an RGB color; other colors pass through
    fn adjust_brightness(color: Color, amount: u8) -> Color {
        if let Color::Rgb(r, g, b) = color {
            Color::Rgb(
                r.saturating_add(amount),
                g.saturating_add(amount),
                b.saturating_add(amount),
            )
        } else {
            color
        }
    }

    /// Default text style
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Muted text style
    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Author name style
    #[must_use]
    pub fn author(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Media indicator style
    #[must_use]
    pub fn media(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    /// Card border style
    #[must_use]
    pub fn card_border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Card background style
    #[must_use]
    pub fn card(&self) -> Style {
        Style::default().bg(self.bg_card)
    }
}
