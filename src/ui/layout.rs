use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Calculated layout regions for the app
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub header: Rect,
    pub content: Rect,
    pub tab_bar: Rect,
}

impl AppLayout {
    /// Split the terminal into header | content | bottom tab bar
    pub fn calculate(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header with bottom border
                Constraint::Length(1), // Gap above the tabs
                Constraint::Min(6),    // Swipeable content
                Constraint::Length(3), // Bottom tab bar (icon + label)
            ])
            .split(area);

        Self {
            header: vertical[0],
            content: vertical[2],
            tab_bar: vertical[3],
        }
    }
}

/// Helper to create a centered rect for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Check whether a terminal cell lies inside a rect
pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stacks_regions() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.header.y, 0);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.content.y, 4);
        assert_eq!(layout.tab_bar.height, 3);
        assert_eq!(layout.tab_bar.y + layout.tab_bar.height, 30);
    }

    #[test]
    fn test_contains() {
        let area = Rect::new(2, 2, 4, 2);
        assert!(contains(area, 2, 2));
        assert!(contains(area, 5, 3));
        assert!(!contains(area, 6, 3));
        assert!(!contains(area, 1, 2));
    }
}
