//! The configuration for a validation session, as read from a toml file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::prelude::*;

/// What the tracker does when an entry of a snapshot fails validation.
#[derive(Debug, Deserialize, Clone, Copy, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Evaluate and record every entry, reporting all violations together.
    #[default]
    #[serde(rename = "collect_all")]
    CollectAll,
    /// Stop at the first rejected entry. Later entries are not recorded.
    #[serde(rename = "fail_fast")]
    FailFast,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::CollectAll => write!(f, "collect_all"),
            FailurePolicy::FailFast => write!(f, "fail_fast"),
        }
    }
}

/// This is the tracker configuration as read from `repstate.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// One of collect_all, fail_fast. Defaults to collect_all.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Seconds to wait after a directory write before partner state is re-read.
    /// Defaults to [repstate_proto::constants::DEFAULT_SETTLE_INTERVAL]
    pub settle_interval: Option<u64>,
    /// The RDN of the container created to provoke replication.
    /// Defaults to [repstate_proto::constants::DEFAULT_FIXTURE_RDN]
    pub fixture_rdn: Option<String>,
}

impl TrackerConfig {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self, OperationError> {
        let mut f = File::open(config_path.as_ref()).map_err(|e| {
            admin_error!(?e, path = ?config_path.as_ref(), "Unable to open config file");
            OperationError::InvalidConfiguration(e.to_string())
        })?;

        let mut contents = String::new();
        f.read_to_string(&mut contents).map_err(|e| {
            admin_error!(?e, "unable to read contents");
            OperationError::InvalidConfiguration(e.to_string())
        })?;

        Self::from_toml_str(contents.as_str())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, OperationError> {
        toml::from_str(contents).map_err(|e| {
            admin_error!(?e, "unable to parse config");
            OperationError::InvalidConfiguration(e.to_string())
        })
    }

    /// Get the settle interval, or the default if not set.
    pub fn get_settle_interval(&self) -> Duration {
        Duration::from_secs(self.settle_interval.unwrap_or(DEFAULT_SETTLE_INTERVAL))
    }

    pub fn get_fixture_rdn(&self) -> &str {
        self.fixture_rdn.as_deref().unwrap_or(DEFAULT_FIXTURE_RDN)
    }

    #[cfg(any(test, feature = "test"))]
    pub fn new_for_test(failure_policy: FailurePolicy) -> Self {
        TrackerConfig {
            failure_policy,
            settle_interval: Some(0),
            fixture_rdn: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = TrackerConfig::from_toml_str("").expect("Failed to parse empty config");
        assert_eq!(cfg, TrackerConfig::default());
        assert_eq!(cfg.failure_policy, FailurePolicy::CollectAll);
        assert_eq!(cfg.get_settle_interval(), Duration::from_secs(10));
        assert_eq!(cfg.get_fixture_rdn(), "OU=ReplStateTest");
    }

    #[test]
    fn test_config_parse() {
        let cfg = TrackerConfig::from_toml_str(
            r#"
failure_policy = "fail_fast"
settle_interval = 3
fixture_rdn = "OU=Test1"
"#,
        )
        .expect("Failed to parse config");
        assert_eq!(cfg.failure_policy, FailurePolicy::FailFast);
        assert_eq!(cfg.get_settle_interval(), Duration::from_secs(3));
        assert_eq!(cfg.get_fixture_rdn(), "OU=Test1");
    }

    #[test]
    fn test_config_rejects_unknown() {
        sketching::test_init();
        assert_eq!(
            TrackerConfig::from_toml_str("failure_policy = \"sometimes\""),
            Err(OperationError::InvalidConfiguration(String::new()))
        );
        assert_eq!(
            TrackerConfig::from_toml_str("bindaddress = \"[::]:8443\""),
            Err(OperationError::InvalidConfiguration(String::new()))
        );
        assert_eq!(
            TrackerConfig::new("/this/path/does/not/exist/repstate.toml"),
            Err(OperationError::InvalidConfiguration(String::new()))
        );
    }
}
