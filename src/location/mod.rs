//! Location service seam
//!
//! The map screen only talks to [`LocationService`]. The concrete service is
//! chosen once at startup by [`detect`]; a `None` result means the capability
//! is missing and the map runs degraded.

mod device;

pub use device::{ConsentPrompter, ConsentRequest, DeviceLocation};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LocationConfig;
use crate::map::Coordinate;

/// Foreground location permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Accuracy preference for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Accuracy {
    #[default]
    Balanced,
    High,
}

/// A location fix
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coords: Coordinate,
    /// Estimated accuracy radius in metres, when the source reports one
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Local>,
}

impl Position {
    pub fn new(coords: Coordinate, accuracy_m: Option<f64>) -> Self {
        Self {
            coords,
            accuracy_m,
            timestamp: Local::now(),
        }
    }
}

/// Location failures surfaced to the map screen
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("location request timed out")]
    Timeout,

    #[error("Location services are disabled")]
    ServicesDisabled,

    #[error("location permission not granted")]
    PermissionDenied,

    #[error("location service unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),
}

/// Device location capability
#[async_trait]
pub trait LocationService: Send + Sync {
    /// Current permission without prompting
    async fn permission_status(&self) -> Result<PermissionStatus, LocationError>;

    /// Ask for permission, prompting when still undetermined
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// Fetch the current position
    async fn current_position(&self, accuracy: Accuracy) -> Result<Position, LocationError>;

    /// Open the settings page where a denied permission can be granted
    fn open_settings(&self) -> Result<(), LocationError>;
}

/// Which position source backs the device location service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Fixed coordinates from configuration
    #[default]
    Fixed,
    /// HTTP IP-geolocation endpoint
    Ip,
    /// No location capability
    None,
}

/// What the simulated OS answers to permission queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    Granted,
    Denied,
    #[default]
    Prompt,
}

/// One-time capability check
pub fn detect(
    config: &LocationConfig,
    prompter: ConsentPrompter,
    settings_target: Option<String>,
) -> Option<Arc<dyn LocationService>> {
    match DeviceLocation::from_config(config, prompter, settings_target) {
        Ok(Some(service)) => {
            tracing::info!(provider = ?config.provider, "Location service available");
            Some(Arc::new(service))
        }
        Ok(None) => {
            tracing::warn!("Location provider disabled in configuration");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Location service failed to initialize");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_detect_none_provider() {
        let (tx, _rx) = mpsc::channel(1);
        let config = LocationConfig {
            provider: ProviderKind::None,
            ..LocationConfig::default()
        };
        assert!(detect(&config, ConsentPrompter::new(tx), None).is_none());
    }

    #[test]
    fn test_detect_malformed_ip_endpoint() {
        let (tx, _rx) = mpsc::channel(1);
        let config = LocationConfig {
            provider: ProviderKind::Ip,
            ip_endpoint: "not a url".to_string(),
            ..LocationConfig::default()
        };
        assert!(detect(&config, ConsentPrompter::new(tx), None).is_none());
    }

    #[test]
    fn test_detect_default_is_available() {
        let (tx, _rx) = mpsc::channel(1);
        assert!(detect(&LocationConfig::default(), ConsentPrompter::new(tx), None).is_some());
    }

    #[test]
    fn test_disabled_error_text() {
        assert!(LocationError::ServicesDisabled
            .to_string()
            .contains("Location services are disabled"));
    }
}
