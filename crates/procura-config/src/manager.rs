use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_FILE_NAME: &str = "config.json";
const STAGING_SUFFIX: &str = "tmp";

/// Reads and writes the installation's [`Config`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<base>/config.json`, creating `base` when missing.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE_NAME)))
    }

    /// Manager rooted at [`Config::default_base_dir`].
    pub fn user_default() -> Result<Self, ConfigError> {
        Self::with_base_dir(Config::default_base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads and validates the stored config. A missing file means defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let config = match fs::read_to_string(&self.config_path) {
            Ok(data) => parse(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(err) => return Err(err.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates `config` and replaces the stored file through a staging copy.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let rendered = render(config)?;
        let staging = staging_path(&self.config_path);
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staging)?;
        file.write_all(rendered.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }
}

fn parse(data: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(data).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn render(config: &Config) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))
}

/// `config.json` stages as `config.json.tmp`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}
