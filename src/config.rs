//! Configuration types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Option key: report addresses on a sub-domain of the base domain.
pub const INCLUDE_SUBDOMAINS: &str = "includesubdomains";
/// Option key: report addresses not on the base domain.
pub const INCLUDE_EXTERNAL: &str = "includeexternal";

/// Scope policy for reported e-mail addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Accept addresses whose domain is a strict sub-domain of the base domain.
    #[serde(rename = "includesubdomains")]
    pub include_subdomains: bool,
    /// Accept addresses whose domain is unrelated to the base domain.
    #[serde(rename = "includeexternal")]
    pub include_external: bool,
    /// Overlay keys this module does not interpret, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            include_subdomains: true,
            include_external: false,
            extra: Map::new(),
        }
    }
}

impl ScopeConfig {
    /// Merge a user overlay over the defaults.
    ///
    /// Every overlay key wins over the default of the same name. Recognized
    /// keys must hold booleans; anything else lands in `extra`.
    pub fn from_overlay(overlay: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, value) in overlay {
            match key.as_str() {
                INCLUDE_SUBDOMAINS => config.include_subdomains = expect_bool(key, value)?,
                INCLUDE_EXTERNAL => config.include_external = expect_bool(key, value)?,
                _ => {
                    config.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(config)
    }

    /// Human-readable descriptions of the recognized options, for host UIs.
    pub fn descriptions() -> &'static [(&'static str, &'static str)] {
        &[
            (
                INCLUDE_SUBDOMAINS,
                "Report e-mail addresses on a sub-domain of the target base domain-name?",
            ),
            (
                INCLUDE_EXTERNAL,
                "Report e-mail addresses not on the target base domain-name?",
            ),
        ]
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a boolean, got {value}"),
    })
}
