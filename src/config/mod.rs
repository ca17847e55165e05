mod loader;
mod types;
mod validator;

pub use loader::ConfigLoader;
pub use types::{
    Config, KeybindingsConfig, LocationConfig, LoggingConfig, MapConfig, MarkerConfig,
};
pub use validator::ConfigValidator;
