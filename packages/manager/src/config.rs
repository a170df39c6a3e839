//! Manager configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RestconfError, Result};
use crate::service::RESTCONF_ROOT;

/// Configuration for the RESTCONF manager.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use restconf_manager::ManagerConfig;
///
/// let config = ManagerConfig::from_json(r#"{"worker_threads": 8}"#).unwrap();
/// assert_eq!(config.worker_threads, 8);
/// assert_eq!(config.root_path, "/restconf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Size of the RPC worker pool, and of its admission limit.
    pub worker_threads: usize,

    /// Name given to RPC worker threads.
    pub thread_name: String,

    /// URL prefix under which RESTCONF resources are served.
    pub root_path: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            worker_threads: 5,
            thread_name: "restconf-worker".to_string(),
            root_path: RESTCONF_ROOT.to_string(),
        }
    }
}

impl ManagerConfig {
    /// Load a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| RestconfError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(RestconfError::InvalidConfig {
                message: "worker_threads must be at least 1".to_string(),
            });
        }
        if !self.root_path.starts_with('/') {
            return Err(RestconfError::InvalidConfig {
                message: format!("root_path '{}' must start with '/'", self.root_path),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.worker_threads, 5);
        assert_eq!(config.thread_name, "restconf-worker");
        assert_eq!(config.root_path, RESTCONF_ROOT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = ManagerConfig::from_json(r#"{"thread_name": "rpc"}"#).unwrap();
        assert_eq!(config.thread_name, "rpc");
        assert_eq!(config.worker_threads, 5);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            ManagerConfig::from_json(r#"{"worker_threads": 0}"#),
            Err(RestconfError::InvalidConfig { .. })
        ));
        assert!(ManagerConfig::from_json(r#"{"root_path": "restconf"}"#).is_err());
        assert!(ManagerConfig::from_json("not json").is_err());
    }
}
