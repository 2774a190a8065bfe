//! Runtime-tunable transform configuration.

use std::error::Error as StdError;
use std::path::Path;

use common::file_format::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lanes::LaneBackend;
use crate::partition::PartitionMode;
use crate::transform::SepiaParams;

/// Default number of workers used by the threaded strategies.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Configuration shared by every strategy.
///
/// Missing fields fall back to their defaults when loading from a file:
///
/// ```yaml
/// params:
///   bias_b: -20
///   bias_g: 20
///   bias_r: 40
/// worker_count: 8
/// timing: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SepiaConfig {
    pub params: SepiaParams,
    /// Workers used by the threaded strategies.
    pub worker_count: usize,
    pub partition: PartitionMode,
    pub lane_backend: LaneBackend,
    /// Measure wall-clock time of each `apply` call.
    pub timing: bool,
}

impl Default for SepiaConfig {
    fn default() -> Self {
        Self {
            params: SepiaParams::default(),
            worker_count: DEFAULT_WORKER_COUNT,
            partition: PartitionMode::default(),
            lane_backend: LaneBackend::default(),
            timing: false,
        }
    }
}

impl SepiaConfig {
    /// Loads a YAML (`.yaml`/`.yml`) or JSON (`.json`) config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |reason: String| Error::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let format = SerdeFormat::from_path(path).map_err(|err| config_error(err.to_string()))?;
        let text = std::fs::read_to_string(path).map_err(|err| config_error(err.to_string()))?;
        let config: Self = format
            .deserialize(&text)
            .map_err(|err| config_error(error_chain(&err)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::InvalidConfig(
                "worker_count must be at least 1".to_string(),
            ));
        }
        self.params.validate()
    }
}

/// `err` followed by each of its sources, separated by `": "`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sepia_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = SepiaConfig::default();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.partition, PartitionMode::Balanced);
        assert_eq!(config.lane_backend, LaneBackend::Auto);
        assert!(!config.timing);
        assert_eq!(config.params, SepiaParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = SepiaConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = SepiaConfig::default();
        config.params.min = 200;
        config.params.max = 100;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_partial_yaml() {
        let path = temp_config(
            "partial.yaml",
            "worker_count: 8\ntiming: true\npartition: Truncating\nparams:\n  bias_r: 60\n",
        );
        let config = SepiaConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.worker_count, 8);
        assert!(config.timing);
        assert_eq!(config.partition, PartitionMode::Truncating);
        assert_eq!(config.params.bias_r, 60);
        assert_eq!(config.params.bias_b, -20);
        assert_eq!(config.lane_backend, LaneBackend::Auto);
    }

    #[test]
    fn test_load_json_round_trip() {
        let config = SepiaConfig {
            worker_count: 3,
            lane_backend: LaneBackend::Portable,
            ..Default::default()
        };
        let text = SerdeFormat::Json.serialize(&config).unwrap();
        let path = temp_config("round_trip.json", &text);
        let loaded = SepiaConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_values_in_file_rejected() {
        let path = temp_config("zero_workers.yml", "worker_count: 0\n");
        let result = SepiaConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SepiaConfig::from_file("sepia.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));
        assert!(err.to_string().contains("sepia.toml"));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("sepia_definitely_missing_config.yaml");
        assert!(matches!(
            SepiaConfig::from_file(&path),
            Err(Error::ConfigFile { .. })
        ));
    }

    #[test]
    fn test_malformed_file_reports_parser_error() {
        let path = temp_config("malformed.json", "{ \"worker_count\": \"many\" }");
        let err = SepiaConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        let Error::ConfigFile { reason, .. } = err else {
            panic!("expected a config file error, got {err:?}");
        };
        assert!(reason.starts_with("JSON serialization failed: "), "{reason}");
    }
}
