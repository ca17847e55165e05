pub mod components;
pub mod layout;
pub mod styles;
pub mod theme;

pub use layout::AppLayout;
pub use styles::Styles;
pub use theme::{Icons, Theme};

/// Spinner animation frames
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Get the spinner glyph for an animation frame counter
pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    /// Flatten a rendered buffer into one string per row
    pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    /// Buffer text with all whitespace removed.
    ///
    /// Wide glyphs leave padding cells behind them, so comparisons are
    /// done on squeezed text.
    pub fn squeezed(buffer: &Buffer) -> String {
        buffer_lines(buffer)
            .concat()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    fn squeeze(needle: &str) -> String {
        needle.chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn contains(buffer: &Buffer, needle: &str) -> bool {
        squeezed(buffer).contains(&squeeze(needle))
    }

    pub fn count(buffer: &Buffer, needle: &str) -> usize {
        squeezed(buffer).matches(&squeeze(needle)).count()
    }
}
