//! Error constructor helpers.
//!
//! These keep call sites short and make sure every variant is built with the
//! same message conventions.
//!
//! ```rust
//! use digits_detector::core::DetectorError;
//!
//! let error = DetectorError::model_load_error(
//!     "models/mnist.onnx",
//!     "failed to open model file",
//!     Some("verify the model file exists and is readable"),
//!     Some(std::io::Error::from(std::io::ErrorKind::NotFound)),
//! );
//! assert!(error.to_string().contains("suggested fix"));
//! ```

use super::types::{DetectorError, SimpleError};

impl DetectorError {
    /// Creates a model load error with an optional suggestion and source.
    ///
    /// # Arguments
    /// * `model_path` - Path (or name) of the model artifact
    /// * `reason` - Short reason description
    /// * `suggestion` - Optional suggestion message (without punctuation)
    /// * `source` - Optional underlying error
    pub fn model_load_error(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {}", s))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an invalid input error describing a field that failed validation.
    ///
    /// # Arguments
    ///
    /// * `component` - The component that rejected the input.
    /// * `field` - The offending field.
    /// * `expected` - The expected value.
    /// * `actual` - The actual value.
    pub fn validation_error(component: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!(
                "Validation failed in {}: field '{}' expected {}, but got '{}'",
                component, field, expected, actual
            ),
        }
    }

    /// Creates an inference error wrapping an underlying engine failure.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an inference error that has no underlying error value.
    pub fn inference_message(model_name: &str, context: impl Into<String>) -> Self {
        let context = context.into();
        Self::Inference {
            model_name: model_name.to_string(),
            source: Box::new(SimpleError::new(context.clone())),
            context,
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true when this error was raised while loading the model.
    pub fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelLoad { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_model_load_error_formats_suggestion() {
        let error = DetectorError::model_load_error(
            "assets/mnist.onnx",
            "failed to open model file",
            Some("verify the model file exists"),
            None::<std::io::Error>,
        );

        assert!(error.is_model_load());
        assert_eq!(
            error.to_string(),
            "failed to load model 'assets/mnist.onnx': failed to open model file; suggested fix: verify the model file exists"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_model_load_error_keeps_source() {
        let error = DetectorError::model_load_error(
            "mnist.onnx",
            "failed to map model file",
            None,
            Some(std::io::Error::other("mmap failed")),
        );

        let source = error.source().expect("source should be set");
        assert_eq!(source.to_string(), "mmap failed");
    }

    #[test]
    fn test_validation_error_message() {
        let error = DetectorError::validation_error("DigitPreprocessor", "height", "28", "64");

        match error {
            DetectorError::InvalidInput { message } => {
                assert_eq!(
                    message,
                    "Validation failed in DigitPreprocessor: field 'height' expected 28, but got '64'"
                );
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_inference_message_sets_source() {
        let error = DetectorError::inference_message("mnist", "output has 9 scores");

        match &error {
            DetectorError::Inference {
                model_name,
                context,
                ..
            } => {
                assert_eq!(model_name, "mnist");
                assert_eq!(context, "output has 9 scores");
            }
            _ => panic!("Expected Inference error"),
        }
        assert_eq!(
            error.source().map(|s| s.to_string()).as_deref(),
            Some("output has 9 scores")
        );
    }
}
