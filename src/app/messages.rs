//! Message types and handling for async communication
//!
//! Background tasks report back to the UI loop through [`AppMessage`].

use crate::classes::{ClassRecord, FetchError};
use crate::location::{LocationError, PermissionStatus, Position};

use super::App;

/// Async message types for communication between tasks and the app
#[derive(Debug)]
pub enum AppMessage {
    /// Class list fetch finished
    ClassesLoaded(Result<Vec<ClassRecord>, FetchError>),

    /// Permission status queried on startup
    PermissionChecked(Result<PermissionStatus, LocationError>),

    /// Permission request answered
    PermissionRequested(Result<PermissionStatus, LocationError>),

    /// Position fetch finished
    PositionFetched(Result<Position, LocationError>),
}

impl App {
    pub(super) fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::ClassesLoaded(result) => {
                self.classes.on_loaded(result);
            }
            AppMessage::PermissionChecked(result) => {
                self.map.on_permission_checked(result);
            }
            AppMessage::PermissionRequested(result) => {
                let update = self.map.on_permission_requested(result);
                if let Some(dialog) = update.dialog {
                    self.show_dialog(dialog);
                }
                if let Some(command) = update.command {
                    self.run_map_command(command);
                }
            }
            AppMessage::PositionFetched(result) => {
                if let Some(dialog) = self.map.on_position(result) {
                    self.show_dialog(dialog);
                }
            }
        }
    }
}
