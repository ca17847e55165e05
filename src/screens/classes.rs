use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::classes::{ClassRecord, FetchError};
use crate::ui::styles::Styles;
use crate::ui::theme::Theme;

pub const LOADING_MESSAGE: &str = "授業データを読み込み中...";
pub const ERROR_MESSAGE: &str = "授業データの取得に失敗しました。";
pub const EMPTY_MESSAGE: &str = "登録されている授業はありません。";

/// Rows taken by one card, borders included
const CARD_HEIGHT: u16 = 5;

/// Lifecycle of the single class-list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassesState {
    Loading,
    Loaded(Vec<ClassRecord>),
    Failed,
}

pub struct ClassesScreen {
    styles: Styles,
    state: ClassesState,
    scroll: usize,
    spinner_frame: usize,
}

impl ClassesScreen {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            styles: Styles::from_theme(theme),
            state: ClassesState::Loading,
            scroll: 0,
            spinner_frame: 0,
        }
    }

    pub fn state(&self) -> &ClassesState {
        &self.state
    }

    /// Apply the fetch outcome. Errors are logged, never shown verbatim.
    pub fn on_loaded(&mut self, result: Result<Vec<ClassRecord>, FetchError>) {
        self.state = match result {
            Ok(records) => ClassesState::Loaded(records),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch classes");
                ClassesState::Failed
            }
        };
        self.scroll = 0;
    }

    pub fn tick(&mut self) {
        if self.state == ClassesState::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if let ClassesState::Loaded(records) = &self.state {
            self.scroll = (self.scroll + 1).min(records.len().saturating_sub(1));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Block::default().style(self.styles.screen), area);

        match &self.state {
            ClassesState::Loading => {
                let line = Line::from(vec![
                    Span::styled(crate::ui::spinner(self.spinner_frame), self.styles.link),
                    Span::raw(" "),
                    Span::styled(LOADING_MESSAGE, self.styles.muted_text),
                ]);
                self.render_centered(frame, area, line);
            }
            ClassesState::Failed => {
                let line = Line::from(Span::styled(ERROR_MESSAGE, self.styles.error_text));
                self.render_centered(frame, area, line);
            }
            ClassesState::Loaded(records) if records.is_empty() => {
                let line = Line::from(Span::styled(EMPTY_MESSAGE, self.styles.muted_text));
                self.render_centered(frame, area, line);
            }
            ClassesState::Loaded(records) => self.render_cards(frame, area, records),
        }
    }

    fn render_centered(&self, frame: &mut Frame, area: Rect, line: Line<'_>) {
        let row = Rect {
            y: area.y + area.height / 2,
            height: 1.min(area.height),
            ..area
        };
        frame.render_widget(Paragraph::new(line).centered(), row);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, records: &[ClassRecord]) {
        let mut y = area.y;
        for record in records.iter().skip(self.scroll) {
            if y + CARD_HEIGHT > area.y + area.height {
                break;
            }
            let card_area = Rect {
                x: area.x + 1,
                y,
                width: area.width.saturating_sub(2),
                height: CARD_HEIGHT,
            };
            self.render_card(frame, card_area, record);
            y += CARD_HEIGHT;
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, record: &ClassRecord) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.styles.border)
            .style(self.styles.surface);
        let lines = vec![
            Line::from(Span::styled(record.name.as_str(), self.styles.title)),
            Line::from(Span::styled(
                format!("担当: {}", record.teacher),
                self.styles.muted_text,
            )),
            Line::from(Span::styled(
                format!("教室: {}", record.room),
                self.styles.muted_text,
            )),
        ];
        let card = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(card, area);
    }
}

impl Default for ClassesScreen {
    fn default() -> Self {
        Self::with_theme(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support;
    use ratatui::{backend::TestBackend, Terminal};

    fn record(n: usize) -> ClassRecord {
        ClassRecord {
            id: format!("U-{}", n),
            name: format!("Course{}", n),
            teacher: format!("Teacher{}", n),
            room: format!("Room{}", n),
        }
    }

    fn draw(screen: &ClassesScreen) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(50, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        terminal
    }

    #[test]
    fn test_starts_loading() {
        let screen = ClassesScreen::default();
        assert_eq!(screen.state(), &ClassesState::Loading);
        let terminal = draw(&screen);
        assert!(test_support::contains(terminal.backend().buffer(), LOADING_MESSAGE));
    }

    #[test]
    fn test_renders_one_card_per_record() {
        let mut screen = ClassesScreen::default();
        screen.on_loaded(Ok((1..=4).map(record).collect()));
        let terminal = draw(&screen);
        let buffer = terminal.backend().buffer();

        assert_eq!(test_support::count(buffer, "担当:"), 4);
        assert_eq!(test_support::count(buffer, "教室:"), 4);
        for n in 1..=4 {
            assert!(test_support::contains(buffer, &format!("Course{}", n)));
            assert!(test_support::contains(buffer, &format!("担当: Teacher{}", n)));
            assert!(test_support::contains(buffer, &format!("教室: Room{}", n)));
        }
    }

    #[test]
    fn test_empty_list_message() {
        let mut screen = ClassesScreen::default();
        screen.on_loaded(Ok(Vec::new()));
        let terminal = draw(&screen);
        let buffer = terminal.backend().buffer();
        assert!(test_support::contains(buffer, EMPTY_MESSAGE));
        assert_eq!(test_support::count(buffer, "担当:"), 0);
    }

    #[test]
    fn test_error_message_hides_cause() {
        let mut screen = ClassesScreen::default();
        screen.on_loaded(Err(FetchError::Status(500)));
        assert_eq!(screen.state(), &ClassesState::Failed);

        let terminal = draw(&screen);
        let buffer = terminal.backend().buffer();
        assert!(test_support::contains(buffer, ERROR_MESSAGE));
        assert!(!test_support::contains(buffer, "500"));
        assert_eq!(test_support::count(buffer, "担当:"), 0);
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut screen = ClassesScreen::default();
        screen.on_loaded(Ok((1..=8).map(record).collect()));
        for _ in 0..20 {
            screen.scroll_down();
        }
        let terminal = draw(&screen);
        let buffer = terminal.backend().buffer();
        assert!(test_support::contains(buffer, "Course8"));
        assert!(!test_support::contains(buffer, "Course7"));

        screen.scroll_up();
        let terminal = draw(&screen);
        assert!(test_support::contains(terminal.backend().buffer(), "Course7"));
    }
}
