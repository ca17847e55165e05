mod dialog;
mod error_screen;
mod header;
mod tab_bar;

pub use dialog::{Dialog, DialogAction, DialogButton};
pub use error_screen::{ErrorScreen, ERROR_TITLE};
pub use header::{Header, APP_TITLE};
pub use tab_bar::{TabBar, TabBarHit};
