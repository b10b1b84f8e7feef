use crate::error::{Result, SakError};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_DIR_ENV: &str = "SAK_CONFIG_DIR";
pub const DATABASE_ENV: &str = "SAK_DATABASE";
pub const FETCH_URL_ENV: &str = "SAK_FETCH_URL";

pub const KEY_AWS_CREDENTIALS: &str = "aws-credentials";
pub const KEY_DATABASE: &str = "database";
pub const KEY_FETCH_URL: &str = "fetch-url";

/// Every settable key, in display order.
pub const KEYS: &[&str] = &[KEY_AWS_CREDENTIALS, KEY_DATABASE, KEY_FETCH_URL];

/// Configuration for sak, stored as `config.json` in the config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SakConfig {
    /// AWS credentials file rewritten by `update-aws`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_credentials: Option<PathBuf>,

    /// SQLite database used by `db` when `--database` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Base URL that relative `fetch` targets are joined to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_url: Option<String>,
}

/// `$SAK_CONFIG_DIR`, or the platform config directory for sak.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| ProjectDirs::from("com", "sak", "sak").map(|d| d.config_dir().to_path_buf()))
}

impl SakConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the given directory, creating it if needed
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies `SAK_DATABASE` and `SAK_FETCH_URL` on top of the file values.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(database) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(url) = lookup(FETCH_URL_ENV).filter(|v| !v.is_empty()) {
            self.fetch_url = Some(url);
        }
        self
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            KEY_AWS_CREDENTIALS => self
                .aws_credentials
                .as_ref()
                .map(|p| p.display().to_string()),
            KEY_DATABASE => self.database.as_ref().map(|p| p.display().to_string()),
            KEY_FETCH_URL => self.fetch_url.clone(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_AWS_CREDENTIALS => self.aws_credentials = Some(PathBuf::from(value)),
            KEY_DATABASE => self.database = Some(PathBuf::from(value)),
            KEY_FETCH_URL => self.fetch_url = Some(value.to_string()),
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    /// The configured credentials file, falling back to `~/.aws/credentials`.
    pub fn aws_credentials_path(&self) -> Option<PathBuf> {
        self.aws_credentials.clone().or_else(|| {
            BaseDirs::new().map(|dirs| dirs.home_dir().join(".aws").join("credentials"))
        })
    }
}

fn unknown_key(key: &str) -> SakError {
    SakError::command(format!(
        "Unknown config key: {key} (expected one of: {})",
        KEYS.join(", ")
    ))
}
