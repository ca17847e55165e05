//! Blocking dialog with one or more buttons

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::layout::centered_rect;
use crate::ui::styles::Styles;

/// Columns between two buttons
const BUTTON_GAP: u16 = 2;

/// What pressing a dialog button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Dismiss,
    OpenSettings,
    AllowLocation,
    DenyLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    pub label: String,
    pub action: DialogAction,
}

impl DialogButton {
    pub fn new(label: impl Into<String>, action: DialogAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Dialog content and button selection.
///
/// Buttons are ordered cancel-first; Esc triggers the first button and the
/// initial selection is the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    title: String,
    message: String,
    buttons: Vec<DialogButton>,
    selected: usize,
}

impl Dialog {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        buttons: Vec<DialogButton>,
    ) -> Self {
        let mut buttons = buttons;
        if buttons.is_empty() {
            buttons.push(DialogButton::new("OK", DialogAction::Dismiss));
        }
        let selected = buttons.len() - 1;
        Self {
            title: title.into(),
            message: message.into(),
            buttons,
            selected,
        }
    }

    /// Informational dialog with a single OK button
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Vec::new())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn buttons(&self) -> &[DialogButton] {
        &self.buttons
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.buttons.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_action(&self) -> DialogAction {
        self.buttons[self.selected].action
    }

    pub fn cancel_action(&self) -> DialogAction {
        self.buttons[0].action
    }

    /// Cells occupied by each button, in button order
    pub fn button_slots(&self, area: Rect) -> Vec<Rect> {
        let row = Self::areas(area).2;
        let widths: Vec<u16> = self
            .buttons
            .iter()
            .map(|button| Span::raw(Self::button_text(button)).width() as u16)
            .collect();
        let total = widths.iter().sum::<u16>() + BUTTON_GAP * (widths.len() as u16).saturating_sub(1);

        // Same offset the centered paragraph uses
        let mut x = row.x + (row.width / 2).saturating_sub(total / 2);
        widths
            .into_iter()
            .map(|width| {
                let slot = Rect::new(x, row.y, width, row.height.min(1)).intersection(row);
                x = x.saturating_add(width + BUTTON_GAP);
                slot
            })
            .collect()
    }

    /// Resolve a click to the action of the button under it
    pub fn hit(&self, area: Rect, x: u16, y: u16) -> Option<DialogAction> {
        let index = self
            .button_slots(area)
            .iter()
            .position(|slot| x >= slot.x && x < slot.right() && y >= slot.y && y < slot.bottom())?;
        Some(self.buttons[index].action)
    }

    fn button_text(button: &DialogButton) -> String {
        format!("[ {} ]", button.label)
    }

    /// Popup, message and button row
    fn areas(area: Rect) -> (Rect, Rect, Rect) {
        let popup = centered_rect(60, 40, area);
        let inner = Block::default().borders(Borders::ALL).inner(popup);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        (popup, chunks[0], chunks[1])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, styles: &Styles) {
        let (popup_area, message_area, button_row) = Self::areas(area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(styles.border)
            .title(Span::styled(format!(" {} ", self.title), styles.title))
            .style(styles.surface);
        frame.render_widget(block, popup_area);

        let message = Paragraph::new(self.message.as_str())
            .style(styles.normal_text)
            .wrap(Wrap { trim: true })
            .centered();
        frame.render_widget(message, message_area);

        let mut spans = Vec::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" ".repeat(BUTTON_GAP as usize)));
            }
            let style = if i == self.selected {
                styles.button
            } else {
                styles.muted_text
            };
            spans.push(Span::styled(Self::button_text(button), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).centered(), button_row);
    }
}
