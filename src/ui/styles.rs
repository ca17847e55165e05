use ratatui::style::{Modifier, Style};

use super::theme::{ColorPalette, Theme};

/// Pre-computed styles for the UI
#[derive(Debug, Clone)]
pub struct Styles {
    pub palette: ColorPalette,

    // Surfaces
    pub screen: Style,
    pub surface: Style,
    pub border: Style,

    // Text styles
    pub normal_text: Style,
    pub muted_text: Style,
    pub title: Style,
    pub error_text: Style,
    pub warning_text: Style,
    pub link: Style,

    // Timetable
    pub day_header: Style,
    pub day_header_selected: Style,
    pub cell: Style,
    pub cell_selected: Style,
    pub period_badge: Style,

    // Tab bar
    pub tab_normal: Style,
    pub tab_active: Style,

    // Buttons
    pub button: Style,
    pub button_disabled: Style,
    pub fab: Style,
}

impl Styles {
    /// Create styles from a theme
    pub fn from_theme(theme: Theme) -> Self {
        Self::from_palette(theme.palette())
    }

    /// Create styles from a color palette
    pub fn from_palette(palette: ColorPalette) -> Self {
        let screen = Style::default().fg(palette.text).bg(palette.background);
        Self {
            screen,
            surface: Style::default().fg(palette.text).bg(palette.surface),
            border: Style::default().fg(palette.border),

            normal_text: Style::default().fg(palette.text),
            muted_text: Style::default().fg(palette.muted),
            title: Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
            error_text: Style::default().fg(palette.error),
            warning_text: Style::default().fg(palette.warning),
            link: Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::UNDERLINED),

            day_header: screen.fg(palette.muted),
            day_header_selected: Style::default()
                .fg(palette.text)
                .bg(palette.selection)
                .add_modifier(Modifier::BOLD),
            cell: screen,
            cell_selected: screen.bg(palette.selection_soft),
            period_badge: Style::default()
                .fg(palette.text)
                .bg(palette.border)
                .add_modifier(Modifier::BOLD),

            tab_normal: Style::default().fg(palette.muted),
            tab_active: Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),

            button: Style::default()
                .fg(palette.on_primary)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(palette.on_primary).bg(palette.muted),
            fab: Style::default()
                .fg(palette.on_primary)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),

            palette,
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::from_theme(Theme::default())
    }
}
