use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::styles::Styles;
use crate::ui::theme::Theme;

pub const BUS_TITLE: &str = "バス時間";
pub const POSTS_TITLE: &str = "投稿";

/// Static screen showing a single centred label
pub struct PlaceholderScreen {
    styles: Styles,
    title: &'static str,
}

impl PlaceholderScreen {
    pub fn with_theme(theme: Theme, title: &'static str) -> Self {
        Self {
            styles: Styles::from_theme(theme),
            title,
        }
    }

    pub fn bus(theme: Theme) -> Self {
        Self::with_theme(theme, BUS_TITLE)
    }

    pub fn posts(theme: Theme) -> Self {
        Self::with_theme(theme, POSTS_TITLE)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Block::default().style(self.styles.screen), area);
        let row = Rect {
            y: area.y + area.height / 2,
            height: 1.min(area.height),
            ..area
        };
        let label = Paragraph::new(Line::from(Span::styled(self.title, self.styles.title)))
            .centered();
        frame.render_widget(label, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_renders_label() {
        let mut terminal = Terminal::new(TestBackend::new(30, 9)).unwrap();
        let screen = PlaceholderScreen::bus(Theme::default());
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let lines = test_support::buffer_lines(terminal.backend().buffer());
        assert!(test_support::contains(terminal.backend().buffer(), BUS_TITLE));
        assert!(lines[0].trim().is_empty());
    }
}
