use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Client configuration, loadable from a TOML file and overridable from
/// the command line. Every field has a default so a missing file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the summarization backend.
    pub base_url: String,
    /// Per-request timeout in seconds. A stalled request or stream fails
    /// with a transport error instead of hanging the session forever.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
