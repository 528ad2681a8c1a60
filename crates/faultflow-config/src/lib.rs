pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the settings file
pub const CONFIG_PATH_ENV: &str = "FAULTFLOW_CONFIG_PATH";

pub const DEFAULT_ALIYUN_ENDPOINT: &str = "https://ecs.{region}.aliyuncs.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider transport settings
///
/// Credentials are never read from here; they come from flags or the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub aliyun: AliyunSettings,
    pub aws: AwsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliyunSettings {
    /// Endpoint template, `{region}` is substituted
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AliyunSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ALIYUN_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AliyunSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwsSettings {
    pub endpoint_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AwsSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.aliyun.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("aliyun.endpoint is empty".to_string()));
        }
        if self.aliyun.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "aliyun.timeout_secs must be positive".to_string(),
            ));
        }
        if self.aws.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "aws.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from the discovered file, or defaults when there is none
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match find_config_file(explicit)? {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_yaml(&content, &path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Find the settings file
///
/// Search order:
/// 1. the explicit path (`--config`), which must exist
/// 2. environment variable FAULTFLOW_CONFIG_PATH, which must exist too
/// 3. current directory: faultflow.yaml, .faultflow.yaml
/// 4. ~/.config/faultflow/config.yaml
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ConfigNotFound(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["faultflow.yaml", ".faultflow.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("faultflow").join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}
