//! Runner settings, loaded from YAML.
//!
//! ```yaml
//! state_file: /var/lib/tubeclock/config.json
//! transport:
//!   kind: tcp
//!   port: 4000
//! face_count: 8
//! poll_interval_ms: 5
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};

/// Where the serial link comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportSettings {
    /// Commands on stdin, responses on stdout.
    Stdio,
    /// One TCP client at a time on `port`.
    Tcp { port: u16 },
}

/// Host runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerSettings {
    /// JSON file holding the saved device configuration.
    pub state_file: PathBuf,
    pub transport: TransportSettings,
    /// Number of clock faces the simulated display offers.
    pub face_count: u8,
    /// Sleep between passes when the link is idle.
    pub poll_interval_ms: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        RunnerSettings {
            state_file: PathBuf::from("tubeclock-config.json"),
            transport: TransportSettings::Stdio,
            face_count: 6,
            poll_interval_ms: 10,
        }
    }
}

impl RunnerSettings {
    /// Parse settings from YAML text.
    pub fn from_yaml(text: &str, path: &Path) -> RunnerResult<Self> {
        // An empty document means all defaults.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: RunnerSettings =
            serde_yaml::from_str(text).map_err(|source| RunnerError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> RunnerResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text, path)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> RunnerResult<()> {
        if self.face_count == 0 {
            return Err(RunnerError::InvalidSettings(
                "face_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = RunnerSettings::from_yaml("face_count: 3\n", Path::new("t.yaml")).unwrap();
        assert_eq!(settings.face_count, 3);
        assert_eq!(settings.transport, TransportSettings::Stdio);
        assert_eq!(settings.poll_interval_ms, 10);
    }

    #[test]
    fn test_empty_document_is_default() {
        let settings = RunnerSettings::from_yaml("", Path::new("t.yaml")).unwrap();
        assert_eq!(settings, RunnerSettings::default());
    }

    #[test]
    fn test_tcp_transport() {
        let yaml = "transport:\n  kind: tcp\n  port: 4000\n";
        let settings = RunnerSettings::from_yaml(yaml, Path::new("t.yaml")).unwrap();
        assert_eq!(settings.transport, TransportSettings::Tcp { port: 4000 });
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RunnerSettings::from_yaml("baud: 115200\n", Path::new("t.yaml")).unwrap_err();
        assert!(matches!(err, RunnerError::SettingsParse { .. }));
    }

    #[test]
    fn test_zero_faces_rejected() {
        let err = RunnerSettings::from_yaml("face_count: 0\n", Path::new("t.yaml")).unwrap_err();
        assert!(matches!(err, RunnerError::InvalidSettings(_)));
    }
}
