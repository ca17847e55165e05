use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::styles::Styles;
use crate::ui::theme::{Icons, Theme};

pub const APP_TITLE: &str = "Kamo 🦆";

/// Width reserved for the settings icon at the right edge
const SETTINGS_HIT_WIDTH: u16 = 6;

/// App header with the title and a settings icon
pub struct Header {
    styles: Styles,
}

impl Header {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            styles: Styles::from_theme(theme),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.styles.border)
            .style(self.styles.surface);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = Paragraph::new(Line::from(Span::styled(
            format!(" {}", APP_TITLE),
            self.styles.title,
        )));
        frame.render_widget(title, inner);

        let settings = Paragraph::new(Line::from(Span::styled(
            format!("{} ", Icons::SETTINGS),
            self.styles.normal_text,
        )))
        .right_aligned();
        frame.render_widget(settings, Self::settings_area(area));
    }

    /// Clickable region of the settings icon
    pub fn settings_area(area: Rect) -> Rect {
        let width = SETTINGS_HIT_WIDTH.min(area.width);
        Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height: area.height.saturating_sub(1).max(1).min(area.height),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::with_theme(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::contains;
    use crate::ui::test_support;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_renders_title() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| Header::default().render(f, f.area()))
            .unwrap();
        assert!(test_support::contains(terminal.backend().buffer(), "Kamo"));
    }

    #[test]
    fn test_settings_area_is_right_edge() {
        let area = Rect::new(0, 0, 40, 3);
        let settings = Header::settings_area(area);
        assert!(contains(settings, 39, 1));
        assert!(!contains(settings, 2, 1));
        assert!(!contains(settings, 39, 2));
    }
}
