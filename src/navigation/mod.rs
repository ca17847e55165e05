//! Swipeable tab navigation
//!
//! The navigator owns the active tab index and publishes every change on a
//! watch channel. Anything that mirrors the active tab (the bottom bar)
//! subscribes instead of keeping its own copy.

use tokio::sync::watch;

use crate::ui::Icons;

/// Screens hosted by the tab container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Timetable,
    Classes,
    Bus,
    Map,
    Posts,
}

/// Static description of one tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabDescriptor {
    pub name: &'static str,
    pub screen: ScreenKind,
    pub icon: &'static str,
}

/// Ordered tab list driving both the container and the bottom bar
pub const TABS: &[TabDescriptor] = &[
    TabDescriptor {
        name: "時間割",
        screen: ScreenKind::Timetable,
        icon: Icons::CALENDAR,
    },
    TabDescriptor {
        name: "授業一覧",
        screen: ScreenKind::Classes,
        icon: Icons::LIST,
    },
    TabDescriptor {
        name: "バス",
        screen: ScreenKind::Bus,
        icon: Icons::BUS,
    },
    TabDescriptor {
        name: "マップ",
        screen: ScreenKind::Map,
        icon: Icons::MAP,
    },
    TabDescriptor {
        name: "投稿",
        screen: ScreenKind::Posts,
        icon: Icons::POSTS,
    },
];

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Content moves left, next tab appears
    Left,
    /// Content moves right, previous tab appears
    Right,
}

/// Minimum horizontal drag distance (cells) recognised as a swipe
pub const SWIPE_THRESHOLD: u16 = 8;

/// Classify a horizontal drag as a swipe
pub fn swipe_from_drag(start_x: u16, end_x: u16) -> Option<Swipe> {
    if end_x + SWIPE_THRESHOLD <= start_x {
        Some(Swipe::Left)
    } else if start_x + SWIPE_THRESHOLD <= end_x {
        Some(Swipe::Right)
    } else {
        None
    }
}

/// Tab container state
pub struct TabNavigator {
    tabs: &'static [TabDescriptor],
    index: usize,
    publisher: watch::Sender<usize>,
}

impl TabNavigator {
    pub fn new() -> Self {
        Self::with_tabs(TABS, 0)
    }

    /// Create a navigator starting at `initial` (clamped to the tab list)
    pub fn with_tabs(tabs: &'static [TabDescriptor], initial: usize) -> Self {
        let index = initial.min(tabs.len().saturating_sub(1));
        let (publisher, _) = watch::channel(index);
        Self {
            tabs,
            index,
            publisher,
        }
    }

    /// Subscribe to active index changes
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.publisher.subscribe()
    }

    pub fn tabs(&self) -> &'static [TabDescriptor] {
        self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    pub fn active(&self) -> &TabDescriptor {
        &self.tabs[self.index]
    }

    /// Navigate to a screen by its tab name. Returns false for unknown names.
    pub fn navigate(&mut self, name: &str) -> bool {
        match self.tabs.iter().position(|t| t.name == name) {
            Some(index) => {
                self.set_index(index);
                true
            }
            None => {
                tracing::warn!(name = %name, "Navigation to unknown tab");
                false
            }
        }
    }

    /// Jump to a tab by position. Out-of-range positions are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.set_index(index);
            true
        } else {
            false
        }
    }

    /// Swipe to the neighbouring tab; stops at either end
    pub fn swipe(&mut self, swipe: Swipe) {
        let next = match swipe {
            Swipe::Left => (self.index + 1).min(self.tabs.len() - 1),
            Swipe::Right => self.index.saturating_sub(1),
        };
        self.set_index(next);
    }

    fn set_index(&mut self, index: usize) {
        if index == self.index {
            return;
        }
        tracing::debug!(from = self.index, to = index, "Tab changed");
        self.index = index;
        // send_replace keeps the value current even with no live subscribers
        self.publisher.send_replace(index);
    }
}

impl Default for TabNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_by_name_publishes_index() {
        let mut nav = TabNavigator::new();
        let rx = nav.subscribe();

        assert!(nav.navigate("マップ"));
        assert_eq!(nav.active_index(), 3);
        assert_eq!(*rx.borrow(), 3);
        assert_eq!(nav.active().screen, ScreenKind::Map);
    }

    #[test]
    fn test_unknown_name_keeps_index() {
        let mut nav = TabNavigator::new();
        assert!(!nav.navigate("学割"));
        assert_eq!(nav.active_index(), 0);
    }

    #[test]
    fn test_swipe_stops_at_edges() {
        let mut nav = TabNavigator::new();
        nav.swipe(Swipe::Right);
        assert_eq!(nav.active_index(), 0);

        for _ in 0..10 {
            nav.swipe(Swipe::Left);
        }
        assert_eq!(nav.active_index(), TABS.len() - 1);
    }

    #[test]
    fn test_subscriber_sees_every_change() {
        let mut nav = TabNavigator::new();
        let mut rx = nav.subscribe();
        assert!(!rx.has_changed().unwrap());

        nav.jump_to(2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);

        // Same index again is not a change
        nav.jump_to(2);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_jump_out_of_range() {
        let mut nav = TabNavigator::new();
        assert!(!nav.jump_to(5));
        assert_eq!(nav.active_index(), 0);
    }

    #[test]
    fn test_swipe_from_drag() {
        assert_eq!(swipe_from_drag(40, 20), Some(Swipe::Left));
        assert_eq!(swipe_from_drag(20, 40), Some(Swipe::Right));
        assert_eq!(swipe_from_drag(20, 25), None);
    }
}
