//! Configuration validation
//!
//! Nothing here is fatal: problems are reported as warnings, logged at
//! startup, and the app keeps running with whatever the config says.

use regex::Regex;
use std::collections::{HashMap, HashSet};

use super::types::{Config, KeybindingsConfig, MapConfig};
use crate::keybindings::KeyBinding;
use crate::location::ProviderKind;
use crate::map::{Region, MAX_TILE_ZOOM};

/// Soft validation warnings shown on startup
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    MissingTilePlaceholder {
        placeholder: &'static str,
    },
    UnknownTilePlaceholder {
        placeholder: String,
    },
    MaxZoomOutOfRange {
        value: u8,
    },
    InvalidRegion {
        field: &'static str,
        reason: String,
    },
    InsecureEndpoint {
        section: &'static str,
        url: String,
    },
    InvalidKeybindingSyntax {
        key: String,
        reason: String,
    },
    DuplicateKeybinding {
        key: String,
        actions: Vec<String>,
    },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::MissingTilePlaceholder { placeholder } => {
                write!(f, "map.tile_url is missing the {{{}}} placeholder", placeholder)
            }
            ValidationWarning::UnknownTilePlaceholder { placeholder } => {
                write!(f, "map.tile_url has unknown placeholder {{{}}}", placeholder)
            }
            ValidationWarning::MaxZoomOutOfRange { value } => {
                write!(
                    f,
                    "map.max_zoom {} is above {}, tiles stop at zoom {}",
                    value, MAX_TILE_ZOOM, MAX_TILE_ZOOM
                )
            }
            ValidationWarning::InvalidRegion { field, reason } => {
                write!(f, "map.initial_region.{}: {}", field, reason)
            }
            ValidationWarning::InsecureEndpoint { section, url } => {
                write!(f, "{}: endpoint '{}' is not an http(s) URL", section, url)
            }
            ValidationWarning::InvalidKeybindingSyntax { key, reason } => {
                write!(f, "Invalid keybinding '{}': {}", key, reason)
            }
            ValidationWarning::DuplicateKeybinding { key, actions } => {
                write!(f, "Key '{}' is bound to multiple actions: {}", key, actions.join(", "))
            }
        }
    }
}

/// Validates a loaded configuration
pub struct ConfigValidator<'a> {
    config: &'a Config,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        self.check_tile_template(&self.config.map, &mut warnings);
        if self.config.map.max_zoom > MAX_TILE_ZOOM {
            warnings.push(ValidationWarning::MaxZoomOutOfRange {
                value: self.config.map.max_zoom,
            });
        }
        self.check_region(&self.config.map.initial_region, &mut warnings);
        self.check_endpoints(&mut warnings);
        if let Some(keybindings) = &self.config.keybindings {
            self.check_keybindings(keybindings, &mut warnings);
        }
        warnings
    }

    fn check_tile_template(&self, map: &MapConfig, warnings: &mut Vec<ValidationWarning>) {
        let Ok(re) = Regex::new(r"\{(\w+)\}") else {
            return;
        };
        let found: HashSet<&str> = re
            .captures_iter(&map.tile_url)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect();

        for placeholder in ["z", "x", "y"] {
            if !found.contains(placeholder) {
                warnings.push(ValidationWarning::MissingTilePlaceholder { placeholder });
            }
        }
        let mut unknown: Vec<&str> = found
            .into_iter()
            .filter(|p| !matches!(*p, "z" | "x" | "y"))
            .collect();
        unknown.sort_unstable();
        for placeholder in unknown {
            warnings.push(ValidationWarning::UnknownTilePlaceholder {
                placeholder: placeholder.to_string(),
            });
        }
    }

    fn check_region(&self, region: &Region, warnings: &mut Vec<ValidationWarning>) {
        if !(-90.0..=90.0).contains(&region.latitude) {
            warnings.push(ValidationWarning::InvalidRegion {
                field: "latitude",
                reason: format!("{} is outside -90..90", region.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&region.longitude) {
            warnings.push(ValidationWarning::InvalidRegion {
                field: "longitude",
                reason: format!("{} is outside -180..180", region.longitude),
            });
        }
        for (field, delta) in [
            ("latitude_delta", region.latitude_delta),
            ("longitude_delta", region.longitude_delta),
        ] {
            if delta <= 0.0 {
                warnings.push(ValidationWarning::InvalidRegion {
                    field,
                    reason: "span must be positive".to_string(),
                });
            }
        }
    }

    fn check_endpoints(&self, warnings: &mut Vec<ValidationWarning>) {
        let is_http = |url: &str| url.starts_with("http://") || url.starts_with("https://");

        if !is_http(&self.config.classes.endpoint) {
            warnings.push(ValidationWarning::InsecureEndpoint {
                section: "classes.endpoint",
                url: self.config.classes.endpoint.clone(),
            });
        }
        let location = &self.config.location;
        if location.provider == ProviderKind::Ip && !is_http(&location.ip_endpoint) {
            warnings.push(ValidationWarning::InsecureEndpoint {
                section: "location.ip_endpoint",
                url: location.ip_endpoint.clone(),
            });
        }
    }

    fn check_keybindings(
        &self,
        keybindings: &KeybindingsConfig,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        let mut by_key: HashMap<String, Vec<String>> = HashMap::new();

        for (action, key) in keybindings.entries() {
            match KeyBinding::parse(key) {
                Ok(binding) => by_key
                    .entry(binding.to_string())
                    .or_default()
                    .push(action.to_string()),
                Err(reason) => warnings.push(ValidationWarning::InvalidKeybindingSyntax {
                    key: key.to_string(),
                    reason,
                }),
            }
        }

        let mut duplicates: Vec<_> = by_key
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .collect();
        duplicates.sort();
        for (key, actions) in duplicates {
            warnings.push(ValidationWarning::DuplicateKeybinding { key, actions });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let config = Config::default();
        assert!(ConfigValidator::new(&config).validate().is_empty());
    }

    #[test]
    fn test_tile_template_placeholders() {
        let mut config = Config::default();
        config.map.tile_url = "https://tiles.example/{z}/{x}/{s}.png".to_string();
        let warnings = ConfigValidator::new(&config).validate();
        assert!(warnings.contains(&ValidationWarning::MissingTilePlaceholder { placeholder: "y" }));
        assert!(warnings.contains(&ValidationWarning::UnknownTilePlaceholder {
            placeholder: "s".to_string()
        }));
    }

    #[test]
    fn test_max_zoom_above_tile_limit() {
        let config: Config = serde_yml::from_str("map:\n  max_zoom: 64\n").unwrap();
        let warnings = ConfigValidator::new(&config).validate();
        assert_eq!(warnings, vec![ValidationWarning::MaxZoomOutOfRange { value: 64 }]);
        assert!(warnings[0].to_string().contains("64"));
    }

    #[test]
    fn test_region_spans_must_be_positive() {
        let mut config = Config::default();
        config.map.initial_region.longitude_delta = 0.0;
        let warnings = ConfigValidator::new(&config).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("longitude_delta"));
    }

    #[test]
    fn test_endpoint_scheme() {
        let mut config = Config::default();
        config.classes.endpoint = "ftp://example.com/users".to_string();
        let warnings = ConfigValidator::new(&config).validate();
        assert!(matches!(
            warnings.as_slice(),
            [ValidationWarning::InsecureEndpoint { section: "classes.endpoint", .. }]
        ));
    }

    #[test]
    fn test_keybinding_problems() {
        let config = Config {
            keybindings: Some(KeybindingsConfig {
                quit: Some("Ctrl+x".to_string()),
                settings: Some("ctrl+X".to_string()),
                profile: Some("Hyper+p".to_string()),
                ..Default::default()
            }),
            ..Config::default()
        };
        let warnings = ConfigValidator::new(&config).validate();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::InvalidKeybindingSyntax { .. })));
        assert!(warnings.iter().any(|w| matches!(
            w,
            ValidationWarning::DuplicateKeybinding { actions, .. } if actions.len() == 2
        )));
    }
}
