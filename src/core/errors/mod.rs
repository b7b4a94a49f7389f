//! Error types for the digit classifier.
//!
//! Every failure the adapter can report is a [`DetectorError`]. Model loading,
//! input validation, and inference failures each have their own variant so that
//! callers can tell a missing model file apart from a malformed bitmap.
//!
//! # Usage
//!
//! ```rust
//! use digits_detector::core::errors::DetectorError;
//!
//! let error = DetectorError::validation_error("DigitPreprocessor", "width", "28", "32");
//! assert!(matches!(error, DetectorError::InvalidInput { .. }));
//!
//! let config_error = DetectorError::config_error("session pool size must be positive");
//! assert!(config_error.to_string().contains("session pool size"));
//! ```

pub mod constructors;
pub mod types;

pub use types::{DetectorError, SimpleError};

/// Convenient result alias for classifier operations.
pub type DetectorResult<T> = Result<T, DetectorError>;
