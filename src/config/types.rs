use serde::Deserialize;

use crate::classes::DEFAULT_ENDPOINT;
use crate::location::{PermissionPolicy, ProviderKind};
use crate::map::{Coordinate, Region, MAX_TILE_ZOOM};
use crate::ui::Theme;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// UI theme: "campus" or "night"
    #[serde(default)]
    pub theme: Theme,

    /// Class list endpoint
    #[serde(default)]
    pub classes: ClassesConfig,

    /// Map viewport, marker and tile source
    #[serde(default)]
    pub map: MapConfig,

    /// Device location service
    #[serde(default)]
    pub location: LocationConfig,

    /// Custom keybindings
    #[serde(default)]
    pub keybindings: Option<KeybindingsConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassesConfig {
    #[serde(default = "default_classes_endpoint")]
    pub endpoint: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classes_endpoint(),
        }
    }
}

fn default_classes_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// XYZ tile URL template with {z}, {x} and {y}
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,

    #[serde(default = "default_tile_size")]
    pub tile_size: u32,

    #[serde(default = "Region::campus_default")]
    pub initial_region: Region,

    #[serde(default)]
    pub marker: MarkerConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            max_zoom: default_max_zoom(),
            tile_size: default_tile_size(),
            initial_region: Region::campus_default(),
            marker: MarkerConfig::default(),
        }
    }
}

fn default_tile_url() -> String {
    "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_max_zoom() -> u8 {
    MAX_TILE_ZOOM
}

fn default_tile_size() -> u32 {
    256
}

/// Fixed map marker
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl MarkerConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            latitude: 35.3660,
            longitude: 139.4315,
            title: "湘南工科大学".to_string(),
            description: "Shonan Institute of Technology (Approx.)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// "fixed", "ip" or "none"
    #[serde(default)]
    pub provider: ProviderKind,

    /// Whether location services are switched on
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// "granted", "denied" or "prompt"
    #[serde(default)]
    pub permission: PermissionPolicy,

    /// Position reported by the fixed provider
    #[serde(default = "default_fixed_position")]
    pub fixed: Coordinate,

    /// JSON endpoint for the ip provider
    #[serde(default = "default_ip_endpoint")]
    pub ip_endpoint: String,

    /// Request timeout for the ip provider
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page opened by "open settings"; defaults to the loaded config file
    #[serde(default)]
    pub settings_url: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            enabled: true,
            permission: PermissionPolicy::default(),
            fixed: default_fixed_position(),
            ip_endpoint: default_ip_endpoint(),
            timeout_secs: default_timeout_secs(),
            settings_url: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fixed_position() -> Coordinate {
    // Fujisawa station
    Coordinate::new(35.3388, 139.4873)
}

fn default_ip_endpoint() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Keybinding configuration for customizing keyboard shortcuts
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KeybindingsConfig {
    pub quit: Option<String>,
    pub next_tab: Option<String>,
    pub prev_tab: Option<String>,
    pub move_up: Option<String>,
    pub move_down: Option<String>,
    pub move_left: Option<String>,
    pub move_right: Option<String>,
    pub execute: Option<String>,
    pub zoom_in: Option<String>,
    pub zoom_out: Option<String>,
    pub settings: Option<String>,
    pub profile: Option<String>,
    pub open_device_settings: Option<String>,
}

impl KeybindingsConfig {
    /// Configured (name, key) pairs, for validation
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("quit", &self.quit),
            ("next_tab", &self.next_tab),
            ("prev_tab", &self.prev_tab),
            ("move_up", &self.move_up),
            ("move_down", &self.move_down),
            ("move_left", &self.move_left),
            ("move_right", &self.move_right),
            ("execute", &self.execute),
            ("zoom_in", &self.zoom_in),
            ("zoom_out", &self.zoom_out),
            ("settings", &self.settings),
            ("profile", &self.profile),
            ("open_device_settings", &self.open_device_settings),
        ]
        .into_iter()
        .filter_map(|(name, key)| key.as_deref().map(|k| (name, k)))
        .collect()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Enable file logging
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log file path template (supports {date} placeholder)
    /// Default: /tmp/kamo-{date}.log
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> String {
    "/tmp/kamo-{date}.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
