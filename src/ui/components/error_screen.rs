use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::ui::styles::Styles;
use crate::ui::theme::Theme;

pub const ERROR_TITLE: &str = "アプリにエラーが発生しました";
pub const RETRY_LABEL: &str = "リロードを試す";

/// Fallback shown in place of the whole UI after a panic
pub struct ErrorScreen {
    styles: Styles,
}

impl ErrorScreen {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            styles: Styles::from_theme(theme),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, message: &str) {
        frame.render_widget(Block::default().style(self.styles.screen), area);
        let rows = Self::rows(area);

        let title = Paragraph::new(Line::from(Span::styled(ERROR_TITLE, self.styles.error_text)))
            .centered();
        frame.render_widget(title, rows[1]);

        let body = Paragraph::new(message)
            .style(self.styles.normal_text)
            .wrap(Wrap { trim: true })
            .centered();
        frame.render_widget(body, rows[3]);

        let retry = Paragraph::new(Line::from(Span::styled(
            format!("[ {} ]", RETRY_LABEL),
            self.styles.button,
        )))
        .centered();
        frame.render_widget(retry, rows[5]);
    }

    /// Row occupied by the retry button
    pub fn retry_area(area: Rect) -> Rect {
        Self::rows(area)[5]
    }

    fn rows(area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1), // Title
                Constraint::Length(1),
                Constraint::Length(3), // Message
                Constraint::Length(1),
                Constraint::Length(1), // Retry
                Constraint::Fill(1),
            ])
            .split(area)
    }
}

impl Default for ErrorScreen {
    fn default() -> Self {
        Self::with_theme(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_fallback() {
        let mut terminal = Terminal::new(TestBackend::new(50, 20)).unwrap();
        terminal
            .draw(|f| ErrorScreen::default().render(f, f.area(), "index out of bounds"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(test_support::contains(buffer, ERROR_TITLE));
        assert!(test_support::contains(buffer, "index out of bounds"));
        assert!(test_support::contains(buffer, RETRY_LABEL));
    }

    #[test]
    fn test_retry_area_is_inside() {
        let area = Rect::new(0, 0, 50, 20);
        let retry = ErrorScreen::retry_area(area);
        assert_eq!(retry.height, 1);
        assert!(retry.y > area.y && retry.y < area.y + area.height);
    }
}
