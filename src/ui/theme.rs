use ratatui::style::Color;
use serde::Deserialize;

/// Available UI themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// University palette - blue, navy and red on white
    #[default]
    Campus,
    /// Same accents on a dark background for dark terminals
    Night,
}

impl Theme {
    /// Get the color palette for this theme
    pub fn palette(&self) -> ColorPalette {
        match self {
            Theme::Campus => ColorPalette::campus(),
            Theme::Night => ColorPalette::night(),
        }
    }
}

/// Color palette for theming
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// Main actions, active tab, headers
    pub primary: Color,
    /// Highlights such as the floating add button
    pub accent: Color,
    /// Selected day header background
    pub selection: Color,
    /// Selected day cell background (softer than `selection`)
    pub selection_soft: Color,
    /// Section backgrounds (time column, footers, placeholders)
    pub surface: Color,
    /// Screen background
    pub background: Color,
    /// Borders and dividers
    pub border: Color,
    /// Secondary text
    pub muted: Color,
    /// Primary text
    pub text: Color,
    /// Text drawn on `primary` (buttons)
    pub on_primary: Color,
    pub warning: Color,
    pub error: Color,
    /// User position dot
    pub info: Color,
}

impl ColorPalette {
    pub fn campus() -> Self {
        Self {
            primary: Color::Rgb(0, 0, 255),           // Keio blue
            accent: Color::Rgb(255, 0, 0),            // Keio red
            selection: Color::Rgb(255, 215, 0),       // Keio yellow
            selection_soft: Color::Rgb(255, 249, 230),
            surface: Color::Rgb(245, 245, 245),
            background: Color::Rgb(255, 255, 255),
            border: Color::Rgb(238, 238, 238),
            muted: Color::Rgb(117, 117, 117),
            text: Color::Rgb(51, 51, 51),
            on_primary: Color::Rgb(255, 255, 255),
            warning: Color::Rgb(255, 193, 7),
            error: Color::Rgb(229, 57, 53),
            info: Color::Rgb(33, 150, 243),
        }
    }

    pub fn night() -> Self {
        Self {
            primary: Color::Rgb(110, 140, 255),
            accent: Color::Rgb(255, 85, 85),
            selection: Color::Rgb(204, 163, 0),
            selection_soft: Color::Rgb(58, 52, 30),
            surface: Color::Rgb(30, 32, 38),
            background: Color::Rgb(18, 18, 22),
            border: Color::Rgb(60, 62, 70),
            muted: Color::Rgb(140, 140, 150),
            text: Color::Rgb(230, 230, 235),
            on_primary: Color::Rgb(255, 255, 255),
            warning: Color::Rgb(255, 202, 40),
            error: Color::Rgb(239, 83, 80),
            info: Color::Rgb(66, 165, 245),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::campus()
    }
}

/// Icon glyphs shared by the header, tab bar and screens
pub struct Icons;

impl Icons {
    pub const CALENDAR: &'static str = "📅";
    pub const LIST: &'static str = "📋";
    pub const BUS: &'static str = "🚌";
    pub const MAP: &'static str = "🗺️";
    pub const POSTS: &'static str = "📝";
    pub const ADD: &'static str = "➕";
    pub const INFO: &'static str = "ℹ️";
    pub const SETTINGS: &'static str = "⚙️";
    pub const PROFILE: &'static str = "◯";
    pub const PIN: &'static str = "📍";
}
