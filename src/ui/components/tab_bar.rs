//! Custom bottom tab bar
//!
//! The bar holds a receiver on the navigator's watch channel and reads the
//! active index at render time, so the highlight cannot drift from the
//! navigator.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::watch;

use crate::navigation::TabDescriptor;
use crate::ui::styles::Styles;
use crate::ui::theme::{Icons, Theme};

/// What a click on the bar landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabBarHit {
    Tab(&'static str),
    Profile,
}

pub struct TabBar {
    styles: Styles,
    tabs: &'static [TabDescriptor],
    active: watch::Receiver<usize>,
}

impl TabBar {
    pub fn with_theme(
        theme: Theme,
        tabs: &'static [TabDescriptor],
        active: watch::Receiver<usize>,
    ) -> Self {
        Self {
            styles: Styles::from_theme(theme),
            tabs,
            active,
        }
    }

    /// Index currently published by the navigator
    pub fn active_index(&self) -> usize {
        *self.active.borrow()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(self.styles.border)
            .style(self.styles.surface);
        frame.render_widget(block, area);

        let active = self.active_index();
        let slots = self.slots(area);

        for (i, (tab, slot)) in self.tabs.iter().zip(slots.iter()).enumerate() {
            let style = if i == active {
                self.styles.tab_active
            } else {
                self.styles.tab_normal
            };
            let item = Paragraph::new(vec![
                Line::from(Span::styled(tab.icon, style)),
                Line::from(Span::styled(tab.name, style)),
            ])
            .centered();
            frame.render_widget(item, *slot);
        }

        if let Some(profile) = slots.last() {
            let circle = Paragraph::new(Line::from(Span::styled(
                format!("( {} )", Icons::PROFILE),
                self.styles.muted_text,
            )))
            .centered();
            frame.render_widget(circle, *profile);
        }
    }

    /// One slot per tab plus a trailing profile slot, below the top border
    pub fn slots(&self, area: Rect) -> Vec<Rect> {
        let inner = Rect {
            y: area.y + 1.min(area.height),
            height: area.height.saturating_sub(1),
            ..area
        };
        let count = self.tabs.len() as u32 + 1;
        let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner)
            .to_vec()
    }

    /// Resolve a click to a tab name or the profile button
    pub fn hit(&self, area: Rect, x: u16, y: u16) -> Option<TabBarHit> {
        let slots = self.slots(area);
        let index = slots.iter().position(|slot| {
            x >= slot.x && x < slot.x + slot.width && y >= area.y && y < area.y + area.height
        })?;
        match self.tabs.get(index) {
            Some(tab) => Some(TabBarHit::Tab(tab.name)),
            None => Some(TabBarHit::Profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{TabNavigator, TABS};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn first_glyph_fg(buffer: &Buffer, slot: Rect, row: u16) -> Option<ratatui::style::Color> {
        (slot.x..slot.x + slot.width)
            .map(|x| &buffer[(x, row)])
            .find(|cell| !cell.symbol().trim().is_empty())
            .map(|cell| cell.fg)
    }

    #[test]
    fn test_hit_maps_slots_to_tabs() {
        let nav = TabNavigator::new();
        let bar = TabBar::with_theme(Theme::default(), TABS, nav.subscribe());
        let area = Rect::new(0, 20, 60, 3);

        assert_eq!(bar.hit(area, 1, 21), Some(TabBarHit::Tab("時間割")));
        assert_eq!(bar.hit(area, 35, 22), Some(TabBarHit::Tab("マップ")));
        assert_eq!(bar.hit(area, 59, 21), Some(TabBarHit::Profile));
        assert_eq!(bar.hit(area, 1, 10), None);
    }

    #[test]
    fn test_highlight_follows_navigator() {
        let mut nav = TabNavigator::new();
        let bar = TabBar::with_theme(Theme::default(), TABS, nav.subscribe());
        let styles = Styles::default();
        let area = Rect::new(0, 0, 60, 3);
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();

        nav.jump_to(2);
        assert_eq!(bar.active_index(), 2);
        terminal.draw(|f| bar.render(f, area)).unwrap();

        let slots = bar.slots(area);
        let label_row = slots[0].y + 1;
        let buffer = terminal.backend().buffer();
        for (i, slot) in slots.iter().take(TABS.len()).enumerate() {
            let expected = if i == 2 {
                styles.tab_active.fg
            } else {
                styles.tab_normal.fg
            };
            assert_eq!(first_glyph_fg(buffer, *slot, label_row), expected, "tab {}", i);
        }
    }
}
