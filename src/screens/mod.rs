//! Tab screens hosted by the navigator

pub mod classes;
pub mod map;
pub mod placeholder;
pub mod timetable;

pub use classes::ClassesScreen;
pub use map::{MapCommand, MapScreen};
pub use placeholder::PlaceholderScreen;
pub use timetable::TimetableScreen;
