//! Weekly timetable grid
//!
//! Six day columns by six period rows. One day is selected at a time and
//! its header and cells are highlighted; the cells themselves are empty.

use chrono::{Datelike, Local, Weekday};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::styles::Styles;
use crate::ui::theme::{Icons, Theme};

/// Day columns; the last one collects Saturday and Sunday
pub const DAYS: [&str; 6] = ["月", "火", "水", "木", "金", "その他"];

/// One teaching period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub ordinal: u8,
    pub start: &'static str,
    pub end: &'static str,
}

pub const PERIODS: [Period; 6] = [
    Period {
        ordinal: 1,
        start: "09:25",
        end: "10:55",
    },
    Period {
        ordinal: 2,
        start: "11:10",
        end: "12:40",
    },
    Period {
        ordinal: 3,
        start: "13:00",
        end: "14:30",
    },
    Period {
        ordinal: 4,
        start: "14:45",
        end: "16:15",
    },
    Period {
        ordinal: 5,
        start: "16:30",
        end: "18:00",
    },
    Period {
        ordinal: 6,
        start: "18:10",
        end: "19:40",
    },
];

pub const TOTAL_UNITS_LABEL: &str = "合計の単位数：0";

const TIME_COLUMN_WIDTH: u16 = 7;

/// Column index for a weekday; weekends share the last column
pub fn day_index_for(weekday: Weekday) -> usize {
    match weekday {
        Weekday::Mon => 0,
        Weekday::Tue => 1,
        Weekday::Wed => 2,
        Weekday::Thu => 3,
        Weekday::Fri => 4,
        Weekday::Sat | Weekday::Sun => 5,
    }
}

/// Column index for today in local time
pub fn current_day_index() -> usize {
    day_index_for(Local::now().weekday())
}

/// Rects of every grid element for one render area
#[derive(Debug, Clone)]
pub(crate) struct GridLayout {
    pub header_cells: Vec<Rect>,
    pub time_cells: Vec<Rect>,
    /// `cells[period][day]`
    pub cells: Vec<Vec<Rect>>,
    pub footer: Rect,
}

impl GridLayout {
    fn calculate(area: Rect) -> Self {
        let mut rows = vec![Constraint::Length(1)];
        rows.extend(PERIODS.iter().map(|_| Constraint::Ratio(1, PERIODS.len() as u32)));
        rows.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(rows)
            .split(area);

        let columns = |row: Rect| {
            let mut constraints = vec![Constraint::Length(TIME_COLUMN_WIDTH)];
            constraints.extend(DAYS.iter().map(|_| Constraint::Fill(1)));
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints)
                .split(row)
        };

        let header = columns(rows[0]);
        let mut time_cells = Vec::with_capacity(PERIODS.len());
        let mut cells = Vec::with_capacity(PERIODS.len());
        for row in &rows[1..=PERIODS.len()] {
            let split = columns(*row);
            time_cells.push(split[0]);
            cells.push(split[1..].to_vec());
        }

        Self {
            header_cells: header[1..].to_vec(),
            time_cells,
            cells,
            footer: rows[PERIODS.len() + 1],
        }
    }
}

pub struct TimetableScreen {
    styles: Styles,
    selected_day: usize,
}

impl TimetableScreen {
    /// Start on today's column
    pub fn with_theme(theme: Theme) -> Self {
        Self::with_selected_day(theme, current_day_index())
    }

    pub fn with_selected_day(theme: Theme, day: usize) -> Self {
        Self {
            styles: Styles::from_theme(theme),
            selected_day: day.min(DAYS.len() - 1),
        }
    }

    pub fn selected_day(&self) -> usize {
        self.selected_day
    }

    /// Select a day column. Out-of-range indices are ignored.
    pub fn select_day(&mut self, index: usize) -> bool {
        if index >= DAYS.len() {
            return false;
        }
        if index != self.selected_day {
            tracing::debug!(day = DAYS[index], "Timetable day selected");
        }
        self.selected_day = index;
        true
    }

    pub fn select_next_day(&mut self) {
        self.select_day((self.selected_day + 1) % DAYS.len());
    }

    pub fn select_prev_day(&mut self) {
        self.select_day((self.selected_day + DAYS.len() - 1) % DAYS.len());
    }

    pub fn is_column_highlighted(&self, day: usize) -> bool {
        day == self.selected_day
    }

    /// Day header under a click, if any
    pub fn day_at(&self, area: Rect, x: u16, y: u16) -> Option<usize> {
        GridLayout::calculate(area)
            .header_cells
            .iter()
            .position(|cell| crate::ui::layout::contains(*cell, x, y))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Block::default().style(self.styles.screen), area);
        let grid = GridLayout::calculate(area);

        for (day, cell) in grid.header_cells.iter().enumerate() {
            let style = if self.is_column_highlighted(day) {
                self.styles.day_header_selected
            } else {
                self.styles.day_header
            };
            let header = Paragraph::new(DAYS[day]).style(style).centered();
            frame.render_widget(header, *cell);
        }

        for (period, time_cell) in PERIODS.iter().zip(grid.time_cells.iter()) {
            frame.render_widget(self.time_label(period, time_cell.height), *time_cell);
        }

        for row in &grid.cells {
            for (day, cell) in row.iter().enumerate() {
                let style = if self.is_column_highlighted(day) {
                    self.styles.cell_selected
                } else {
                    self.styles.cell
                };
                let block = Block::default()
                    .borders(Borders::LEFT | Borders::BOTTOM)
                    .border_style(self.styles.border)
                    .style(style);
                frame.render_widget(block, *cell);
            }
        }

        let footer = Paragraph::new(Line::from(vec![
            Span::styled(TOTAL_UNITS_LABEL, self.styles.normal_text),
            Span::raw(" "),
            Span::styled(Icons::INFO, self.styles.muted_text),
        ]));
        frame.render_widget(footer, grid.footer);

        // Add button, not wired to anything yet
        let fab = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", Icons::ADD),
            self.styles.fab,
        )))
        .right_aligned();
        frame.render_widget(fab, grid.footer);
    }

    fn time_label(&self, period: &Period, height: u16) -> Paragraph<'static> {
        let badge = Span::styled(format!(" {} ", period.ordinal), self.styles.period_badge);
        let lines = if height >= 3 {
            vec![
                Line::from(Span::styled(period.start, self.styles.muted_text)),
                Line::from(badge),
                Line::from(Span::styled(period.end, self.styles.muted_text)),
            ]
        } else {
            vec![Line::from(vec![
                badge,
                Span::styled(period.start, self.styles.muted_text),
            ])]
        };
        Paragraph::new(lines).centered()
    }
}

impl Default for TimetableScreen {
    fn default() -> Self {
        Self::with_theme(Theme::default())
    }
}
