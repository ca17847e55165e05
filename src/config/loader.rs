use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Configuration file loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

/// A parsed configuration together with the file it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(config_path: Option<&str>) -> Self {
        Self {
            config_path: config_path.map(PathBuf::from),
        }
    }

    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// An explicit path that is missing or unparseable is an error; an
    /// absent file in the standard locations is not.
    pub fn load(&self) -> Result<LoadedConfig> {
        let Some(path) = self.find_config_file()? else {
            return Ok(LoadedConfig::default());
        };

        let config = Self::load_from(&path)?;
        Ok(LoadedConfig {
            config,
            source: Some(path),
        })
    }

    /// Read and parse one configuration file
    pub fn load_from(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Search for configuration file in standard locations
    fn find_config_file(&self) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it
        if let Some(path) = &self.config_path {
            let expanded = expand_home(path)?;
            if expanded.exists() {
                return Ok(Some(expanded));
            }
            return Err(anyhow!("Config file not found: {}", path.display()));
        }

        Ok(search_paths().into_iter().find(|path| path.exists()))
    }
}

/// Standard config locations, most specific first
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./kamo.yml"), PathBuf::from("./kamo.yaml")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("kamo").join("config.yml"));
        paths.push(config_dir.join("kamo").join("config.yaml"));
    }

    paths
}

/// Expand ~ to home directory
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix('~') {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        let rest = stripped.strip_prefix('/').unwrap_or(stripped);
        Ok(home.join(rest))
    } else {
        Ok(path.to_path_buf())
    }
}
