//! Configuration at ~/.config/parishcal/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalError, CalResult};

static DEFAULT_CACHE_KEY: &str = "churchEvents";
static DEFAULT_SESSION_TTL: &str = "12h";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("parishcal"))
        .unwrap_or_else(|| PathBuf::from("~/.parishcal"))
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

fn default_session_ttl() -> String {
    DEFAULT_SESSION_TTL.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalendarConfig {
    /// Where the local cache lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the cache slot inside `data_dir`.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// URL or path of the deploy-time `events.json`.
    #[serde(default)]
    pub snapshot: Option<String>,

    /// Shared secret for the admin gate. Without one nobody can log in.
    #[serde(default)]
    pub admin_secret: Option<String>,

    /// How long an admin session lasts, e.g. "12h" or "30m".
    #[serde(default = "default_session_ttl")]
    pub session_ttl: String,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Location of `events.json` in the website repository.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
    pub api_base: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            owner: "javakoi".into(),
            repo: "trinity-reformed-website".into(),
            path: "events.json".into(),
            branch: "main".into(),
            api_base: "https://api.github.com".into(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            data_dir: default_data_dir(),
            cache_key: default_cache_key(),
            snapshot: None,
            admin_secret: None,
            session_ttl: default_session_ttl(),
            remote: RemoteConfig::default(),
        }
    }
}

impl CalendarConfig {
    pub fn config_path() -> CalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalError::Config("Could not determine config directory".into()))?
            .join("parishcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented-out default on first run.
    /// `PARISHCAL_*` environment variables override file values.
    pub fn load() -> CalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("PARISHCAL").separator("__"))
            .build()
            .map_err(|e| CalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn session_ttl(&self) -> CalResult<Duration> {
        humantime::parse_duration(&self.session_ttl).map_err(|e| {
            CalError::Config(format!("Invalid session_ttl '{}': {}", self.session_ttl, e))
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalResult<()> {
        let remote = RemoteConfig::default();
        let contents = format!(
            "\
# parishcal configuration

# Where the local event cache is kept:
# data_dir = \"{data_dir}\"
# cache_key = \"{cache_key}\"

# Deploy-time events.json (URL or local path), used when the repository
# can't be reached:
# snapshot = \"https://example.org/events.json\"

# Shared secret for admin login:
# admin_secret = \"change-me\"
# session_ttl = \"{ttl}\"

# Repository holding events.json:
# [remote]
# owner = \"{owner}\"
# repo = \"{repo}\"
# path = \"{path}\"
# branch = \"{branch}\"
# api_base = \"{api_base}\"
",
            data_dir = default_data_dir().display(),
            cache_key = DEFAULT_CACHE_KEY,
            ttl = DEFAULT_SESSION_TTL,
            owner = remote.owner,
            repo = remote.repo,
            path = remote.path,
            branch = remote.branch,
            api_base = remote.api_base,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
