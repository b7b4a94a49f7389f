//! Detector configuration.
//!
//! A [`DetectorConfig`] can be built in code or loaded from JSON. Every field
//! has a default, so a config file only needs the keys it wants to override:
//!
//! ```rust
//! use digits_detector::core::config::{DetectorConfig, InputLayout};
//!
//! let config = DetectorConfig::from_json_str(r#"{ "model_path": "assets/mnist.onnx", "input_layout": "nchw" }"#).unwrap();
//! assert_eq!(config.input_layout, InputLayout::Nchw);
//! assert_eq!(config.session_pool_size, 1);
//! ```

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::{DEFAULT_MODEL_NAME, DEFAULT_MODEL_PATH};
use crate::processors::DecisionRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Memory layout of the model's 4D input tensor.
///
/// The flat pixel order is identical for both layouts because the model takes
/// a single channel; only the declared shape differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLayout {
    /// `[batch, height, width, channels]`, as exported from TensorFlow.
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]`, as exported from PyTorch.
    Nchw,
}

/// Configuration for building a [`crate::models::DigitsDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path to the model file.
    pub model_path: PathBuf,
    /// Name used in logs and errors; defaults to the model file stem.
    pub model_name: Option<String>,
    /// Name of the input tensor; defaults to the model's first input.
    pub input_name: Option<String>,
    /// Name of the output tensor; defaults to the model's first output.
    pub output_name: Option<String>,
    /// Declared layout of the input tensor.
    pub input_layout: InputLayout,
    /// Rule used to turn the score vector into a digit.
    pub decision_rule: DecisionRule,
    /// Number of ONNX Runtime sessions to keep for concurrent callers.
    pub session_pool_size: usize,
    /// ONNX Runtime session settings.
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_name: None,
            input_name: None,
            output_name: None,
            input_layout: InputLayout::default(),
            decision_rule: DecisionRule::default(),
            session_pool_size: 1,
            ort_session: None,
        }
    }
}

impl DetectorConfig {
    /// Creates a configuration for the model at `model_path`.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// A relative `model_path` inside the file is resolved against the
    /// directory containing the file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&contents)?;
        if config.model_path.is_relative()
            && let Some(dir) = path.parent()
        {
            config.model_path = dir.join(&config.model_path);
        }
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the configured model name, falling back to the file stem.
    pub fn effective_model_name(&self) -> String {
        self.model_name
            .clone()
            .or_else(|| {
                self.model_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string())
    }
}

impl ConfigValidator for DetectorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "model_path must not be empty".to_string(),
            });
        }

        self.validate_positive("session_pool_size", self.session_pool_size)?;

        if let DecisionRule::Threshold { min_score } = self.decision_rule {
            self.validate_score_threshold(min_score)?;
        }

        for (field, name) in [
            ("input_name", &self.input_name),
            ("output_name", &self.output_name),
        ] {
            if name.as_deref().is_some_and(str::is_empty) {
                return Err(ConfigError::InvalidConfig {
                    message: format!("{} must not be empty when set", field),
                });
            }
        }

        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_positive("ort_session.intra_threads", threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_positive("ort_session.inter_threads", threads)?;
            }
            if let Some(level) = ort.log_severity_level
                && !(0..=4).contains(&level)
            {
                return Err(ConfigError::InvalidConfig {
                    message: format!("log_severity_level must be between 0 and 4, got {}", level),
                });
            }
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::get_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_path, PathBuf::from("mnist.onnx"));
        assert_eq!(config.decision_rule, DecisionRule::ArgMax);
        assert_eq!(config.effective_model_name(), "mnist");
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let config = DetectorConfig {
            session_pool_size: 0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = DetectorConfig {
            decision_rule: DecisionRule::Threshold { min_score: 1.5 },
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_tensor_name_rejected() {
        let config = DetectorConfig {
            output_name: Some(String::new()),
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_json_uses_defaults() {
        let config = DetectorConfig::from_json_str(
            r#"{
                "model_name": "lenet",
                "decision_rule": { "type": "exact_match" },
                "ort_session": { "intra_threads": 2 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.effective_model_name(), "lenet");
        assert_eq!(config.decision_rule, DecisionRule::ExactMatch);
        assert_eq!(config.session_pool_size, 1);
        assert_eq!(
            config.ort_session.and_then(|o| o.intra_threads),
            Some(2)
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = DetectorConfig {
            decision_rule: DecisionRule::Threshold { min_score: 0.6 },
            input_layout: InputLayout::Nchw,
            ..DetectorConfig::new("models/mnist-12.onnx")
        };
        let json = config.to_json_string().unwrap();
        let parsed = DetectorConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_json_file_resolves_relative_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{ "model_path": "mnist.onnx" }}"#).unwrap();

        let config = DetectorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.model_path, dir.path().join("mnist.onnx"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = DetectorConfig::from_json_file("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_json_reports_parse_error() {
        let result = DetectorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
