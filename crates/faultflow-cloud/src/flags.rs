//! Action flags and per-invocation identity resolution

use crate::error::ActionError;
use std::collections::BTreeMap;

/// Environment fallback for `accessKeyId`
pub const ACCESS_KEY_ID_ENV: &str = "ACCESS_KEY_ID";
/// Environment fallback for `accessKeySecret`
pub const ACCESS_KEY_SECRET_ENV: &str = "ACCESS_KEY_SECRET";

pub const ACCESS_KEY_ID: &str = "accessKeyId";
pub const ACCESS_KEY_SECRET: &str = "accessKeySecret";
pub const REGION_ID: &str = "regionId";
pub const TYPE: &str = "type";

/// Named string flags passed to an action
///
/// Blank values are treated exactly like absent ones.
#[derive(Debug, Clone, Default)]
pub struct ActionFlags {
    values: BTreeMap<String, String>,
}

impl ActionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Trimmed, non-blank value of a flag
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &str) -> Result<&str, ActionError> {
        self.get(name).ok_or_else(|| ActionError::missing(name))
    }

    /// Required comma-separated list
    pub fn require_list(&self, name: &str) -> Result<Vec<String>, ActionError> {
        let items = split_list(self.require(name)?);
        if items.is_empty() {
            return Err(ActionError::missing(name));
        }
        Ok(items)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionFlags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flags = ActionFlags::new();
        for (k, v) in iter {
            flags.set(k, v);
        }
        flags
    }
}

/// Split a comma-separated flag value, dropping empty items
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .finish()
    }
}

impl Credentials {
    /// Take the key pair from flags, falling back to `ACCESS_KEY_ID` / `ACCESS_KEY_SECRET`
    pub fn resolve(flags: &ActionFlags) -> Result<Self, ActionError> {
        let access_key_id = flag_or_env(flags, ACCESS_KEY_ID, ACCESS_KEY_ID_ENV)?;
        let access_key_secret = flag_or_env(flags, ACCESS_KEY_SECRET, ACCESS_KEY_SECRET_ENV)?;
        Ok(Self {
            access_key_id,
            access_key_secret,
        })
    }
}

fn flag_or_env(flags: &ActionFlags, name: &str, env: &str) -> Result<String, ActionError> {
    if let Some(value) = flags.get(name) {
        return Ok(value.to_string());
    }
    match std::env::var(env) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => {
            tracing::warn!("could not get {} from env or parameter", env);
            Err(ActionError::missing(name))
        }
    }
}

/// Credentials and region of one invocation; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    pub credentials: Credentials,
    pub region_id: String,
}

impl ResourceIdentity {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        region_id: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials {
                access_key_id: access_key_id.into(),
                access_key_secret: access_key_secret.into(),
            },
            region_id: region_id.into(),
        }
    }

    pub fn resolve(flags: &ActionFlags) -> Result<Self, ActionError> {
        let credentials = Credentials::resolve(flags)?;
        let region_id = flags.require(REGION_ID)?.to_string();
        Ok(Self {
            credentials,
            region_id,
        })
    }
}
