use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub prompt: String,
    pub correct: String,
    pub incorrect: String,
    pub muted: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub cursor_bg: String,
    pub cursor_fg: String,
}

impl Theme {
    /// User theme from `<config dir>/cipher-drill/theme.toml`, if present and
    /// parseable. Missing color keys fall back to the built-in palette.
    pub fn load_user() -> Option<Self> {
        let path = dirs::config_dir()?.join("cipher-drill").join("theme.toml");
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str::<Theme>(&content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unparseable theme");
                None
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "mocha".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            prompt: "#f9e2af".to_string(),
            correct: "#a6e3a1".to_string(),
            incorrect: "#f38ba8".to_string(),
            muted: "#585b70".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            cursor_bg: "#f5e0dc".to_string(),
            cursor_fg: "#1e1e2e".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && hex.is_ascii()
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn prompt(&self) -> Color { Self::parse_color(&self.prompt) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn incorrect(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn cursor_bg(&self) -> Color { Self::parse_color(&self.cursor_bg) }
    pub fn cursor_fg(&self) -> Color { Self::parse_color(&self.cursor_fg) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("#fff"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn test_parse_color_rejects_multibyte_without_panicking() {
        // six bytes, four chars
        assert_eq!(ThemeColors::parse_color("#a€bc"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("ééé"), Color::Reset);

        let mut colors = ThemeColors::default();
        colors.accent = "#a€bc".to_string();
        assert_eq!(colors.accent(), Color::Reset);
    }

    #[test]
    fn test_partial_theme_uses_defaults() {
        let theme: Theme = toml::from_str(
            r##"
name = "custom"
[colors]
accent = "#010203"
"##,
        )
        .unwrap();
        assert_eq!(theme.colors.accent(), Color::Rgb(1, 2, 3));
        assert_eq!(theme.colors.bg, ThemeColors::default().bg);
    }
}
