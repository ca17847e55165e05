//! Background work
//!
//! Every spawn_* method clones what it needs, runs on a tokio task and
//! reports back with an [`AppMessage`].

use crate::location::Accuracy;
use crate::screens::MapCommand;

use super::{App, AppMessage};

impl App {
    pub(super) fn spawn_classes_fetch(&self) {
        let message_tx = self.message_tx.clone();
        let client = self.classes_client.clone();

        tokio::spawn(async move {
            let result = client.fetch().await;
            let _ = message_tx.send(AppMessage::ClassesLoaded(result)).await;
        });
    }

    pub(super) fn spawn_permission_check(&self) {
        let Some(service) = self.location.clone() else {
            return;
        };
        let message_tx = self.message_tx.clone();

        tokio::spawn(async move {
            let result = service.permission_status().await;
            let _ = message_tx.send(AppMessage::PermissionChecked(result)).await;
        });
    }

    fn spawn_permission_request(&self) {
        let Some(service) = self.location.clone() else {
            return;
        };
        let message_tx = self.message_tx.clone();

        tokio::spawn(async move {
            let result = service.request_permission().await;
            let _ = message_tx
                .send(AppMessage::PermissionRequested(result))
                .await;
        });
    }

    fn spawn_locate(&self) {
        let Some(service) = self.location.clone() else {
            return;
        };
        let message_tx = self.message_tx.clone();

        tokio::spawn(async move {
            let result = service.current_position(Accuracy::High).await;
            let _ = message_tx.send(AppMessage::PositionFetched(result)).await;
        });
    }

    pub(super) fn run_map_command(&self, command: MapCommand) {
        tracing::debug!(command = ?command, "Map command");
        match command {
            MapCommand::RequestPermission => self.spawn_permission_request(),
            MapCommand::Locate => self.spawn_locate(),
        }
    }

    /// Open the page where location access can be changed
    pub(super) fn open_device_settings(&self) {
        let Some(service) = &self.location else {
            return;
        };
        if let Err(e) = service.open_settings() {
            tracing::error!(error = %e, "Failed to open settings");
        }
    }
}
