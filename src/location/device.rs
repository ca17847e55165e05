//! Configuration-driven device location service
//!
//! Permission follows the configured policy. Under the prompt policy the
//! first request asks the user through the app's consent popup; the answer
//! sticks for the rest of the session.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use super::{
    Accuracy, LocationError, LocationService, PermissionPolicy, PermissionStatus, Position,
    ProviderKind,
};
use crate::config::LocationConfig;
use crate::map::Coordinate;

/// A pending permission prompt; answer through `reply`
#[derive(Debug)]
pub struct ConsentRequest {
    pub reply: oneshot::Sender<bool>,
}

/// Sends permission prompts to whoever renders them
#[derive(Debug, Clone)]
pub struct ConsentPrompter {
    tx: mpsc::Sender<ConsentRequest>,
}

impl ConsentPrompter {
    pub fn new(tx: mpsc::Sender<ConsentRequest>) -> Self {
        Self { tx }
    }

    /// Ask the user and wait for the answer
    pub async fn ask(&self) -> Result<bool, LocationError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(ConsentRequest { reply })
            .await
            .map_err(|_| LocationError::Failed("permission prompt unavailable".to_string()))?;
        answer
            .await
            .map_err(|_| LocationError::Failed("permission prompt dismissed".to_string()))
    }
}

enum PositionSource {
    Fixed(Coordinate),
    Ip {
        http: reqwest::Client,
        endpoint: String,
    },
}

/// Location service backed by configuration
pub struct DeviceLocation {
    source: PositionSource,
    services_enabled: bool,
    permission: Mutex<PermissionStatus>,
    prompter: ConsentPrompter,
    settings_target: Option<String>,
}

/// IP geolocation payloads differ between providers; accept both spellings
#[derive(Debug, Deserialize)]
struct IpLocation {
    #[serde(alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "lon")]
    longitude: Option<f64>,
    accuracy: Option<f64>,
}

impl DeviceLocation {
    /// Build the service; `Ok(None)` when the provider is switched off
    pub fn from_config(
        config: &LocationConfig,
        prompter: ConsentPrompter,
        settings_target: Option<String>,
    ) -> Result<Option<Self>> {
        let source = match config.provider {
            ProviderKind::None => return Ok(None),
            ProviderKind::Fixed => PositionSource::Fixed(config.fixed),
            ProviderKind::Ip => {
                let endpoint = config.ip_endpoint.trim();
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                    bail!("Invalid IP geolocation endpoint: {:?}", endpoint);
                }
                let http = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .build()
                    .context("Failed to create HTTP client")?;
                PositionSource::Ip {
                    http,
                    endpoint: endpoint.to_string(),
                }
            }
        };

        let permission = match config.permission {
            PermissionPolicy::Granted => PermissionStatus::Granted,
            PermissionPolicy::Denied => PermissionStatus::Denied,
            PermissionPolicy::Prompt => PermissionStatus::Undetermined,
        };

        Ok(Some(Self {
            source,
            services_enabled: config.enabled,
            permission: Mutex::new(permission),
            prompter,
            settings_target,
        }))
    }

    fn status(&self) -> Result<PermissionStatus, LocationError> {
        self.permission
            .lock()
            .map(|guard| *guard)
            .map_err(|_| LocationError::Failed("permission state poisoned".to_string()))
    }

    fn set_status(&self, status: PermissionStatus) -> Result<(), LocationError> {
        let mut guard = self
            .permission
            .lock()
            .map_err(|_| LocationError::Failed("permission state poisoned".to_string()))?;
        *guard = status;
        Ok(())
    }

    async fn fetch_ip_position(
        http: &reqwest::Client,
        endpoint: &str,
    ) -> Result<Position, LocationError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Failed(e.to_string())
            }
        };

        let response = http.get(endpoint).send().await.map_err(classify)?;
        if !response.status().is_success() {
            return Err(LocationError::Failed(format!(
                "geolocation endpoint returned {}",
                response.status()
            )));
        }
        let body: IpLocation = response.json().await.map_err(classify)?;

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Position::new(
                Coordinate::new(latitude, longitude),
                body.accuracy,
            )),
            _ => Err(LocationError::Failed(
                "position data is incomplete".to_string(),
            )),
        }
    }
}

#[async_trait]
impl LocationService for DeviceLocation {
    async fn permission_status(&self) -> Result<PermissionStatus, LocationError> {
        self.status()
    }

    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        let current = self.status()?;
        if current != PermissionStatus::Undetermined {
            return Ok(current);
        }

        let granted = self.prompter.ask().await?;
        let status = if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        tracing::info!(?status, "Location permission answered");
        self.set_status(status)?;
        Ok(status)
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Position, LocationError> {
        if !self.services_enabled {
            return Err(LocationError::ServicesDisabled);
        }
        if !self.status()?.is_granted() {
            return Err(LocationError::PermissionDenied);
        }

        match &self.source {
            PositionSource::Fixed(coords) => Ok(Position::new(*coords, Some(5.0))),
            PositionSource::Ip { http, endpoint } => {
                if accuracy >= Accuracy::High {
                    tracing::debug!("IP geolocation cannot honour high accuracy; using city level");
                }
                Self::fetch_ip_position(http, endpoint).await
            }
        }
    }

    fn open_settings(&self) -> Result<(), LocationError> {
        let target = self
            .settings_target
            .as_deref()
            .ok_or_else(|| LocationError::Unavailable("no settings page configured".to_string()))?;
        tracing::info!(target = %target, "Opening settings");
        open::that(target).map_err(|e| LocationError::Failed(e.to_string()))
    }
}
