//! Colour palette and text styles used across the UI.
//!
//! Section opacity is rendered as brightness: [`Theme::fade`] blends a
//! palette colour toward the page background.

use ratatui::style::{Color, Modifier, Style};

/// RGB triple of the palette.
pub type Rgb = (u8, u8, u8);

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const BACKGROUND: Rgb = (10, 10, 12);
    pub const TEXT: Rgb = (235, 235, 235);
    pub const MUTED: Rgb = (140, 140, 150);
    pub const ACCENT: Rgb = (120, 200, 255);

    /// Dither levels, darkest first.
    pub const BACKDROP: [Rgb; 4] = [(14, 14, 18), (26, 26, 34), (40, 40, 52), (58, 58, 74)];

    /// Blend `rgb` toward the background by `1 - opacity`.
    pub fn fade(rgb: Rgb, opacity: f64) -> Color {
        let t = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (f64::from(bg) + (f64::from(fg) - f64::from(bg)) * t).round() as u8;
        let (bg_r, bg_g, bg_b) = Self::BACKGROUND;
        Color::Rgb(mix(rgb.0, bg_r), mix(rgb.1, bg_g), mix(rgb.2, bg_b))
    }

    pub fn rgb(rgb: Rgb) -> Color {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }

    // ── page text ──────────────────────────────────────────────
    pub fn text_style(opacity: f64) -> Style {
        Style::default().fg(Self::fade(Self::TEXT, opacity))
    }

    pub fn heading_style(opacity: f64) -> Style {
        Self::text_style(opacity).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(opacity: f64) -> Style {
        Style::default().fg(Self::fade(Self::MUTED, opacity))
    }

    pub fn accent_style(opacity: f64) -> Style {
        Style::default()
            .fg(Self::fade(Self::ACCENT, opacity))
            .add_modifier(Modifier::BOLD)
    }

    /// Letters of the reveal phrase that are not shown yet.
    pub fn ghost_style() -> Style {
        Style::default().fg(Self::fade(Self::MUTED, 0.18))
    }

    // ── search hero ────────────────────────────────────────────
    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn placeholder_style() -> Style {
        Style::default()
            .fg(Self::rgb(Self::MUTED))
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style(opacity: f64) -> Style {
        Style::default().fg(Self::fade(Self::MUTED, opacity))
    }

    pub fn focused_border_style() -> Style {
        Style::default().fg(Self::rgb(Self::ACCENT))
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
