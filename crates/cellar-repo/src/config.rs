use std::path::Path;

use cellar_types::SessionHandle;
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Settings for one [`Session`](crate::Session).
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Label carried in log output.
    pub name: String,
    /// First session handle the in-memory store hands out. Must be non-zero.
    pub first_handle: u32,
    /// Record nested section timings through the session's [`Watch`](crate::Watch).
    pub timing: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            first_handle: 1,
            timing: false,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> RepoResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| RepoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RepoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> RepoResult<()> {
        self.first_handle_checked().map(|_| ())
    }

    /// The configured first handle as a typed value.
    pub fn first_handle_checked(&self) -> RepoResult<SessionHandle> {
        SessionHandle::new(self.first_handle)
            .map_err(|_| RepoError::Config("first_handle must be non-zero".into()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }
}
