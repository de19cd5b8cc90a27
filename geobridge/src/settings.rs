use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use geobridge_core::MapSettings;
use geobridge_utils::RequestSettings;

const CONFIG_PREFIX: &str = "GEOBRIDGE";
const CONFIG_FILE_PATH: &str = "./geobridge.toml";
const CONFIG_FILE_ENV_PATH_KEY: &str = "GEOBRIDGE_CONFIG_FILE";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub request: RequestSettings,
    pub map: MapSettings,
}

impl Settings {
    /// Defaults, then `./geobridge.toml`, then the file named by
    /// `GEOBRIDGE_CONFIG_FILE`, then `GEOBRIDGE__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name(CONFIG_FILE_PATH).required(false));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV_PATH_KEY) {
            tracing::info!("Try read config from: {}", config_path);
            builder = builder.add_source(File::with_name(&config_path));
        };

        builder
            .add_source(
                Environment::with_prefix(CONFIG_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}
