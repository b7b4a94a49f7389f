//! Configuration management for the digit detector.
//!
//! This module provides the detector configuration, ONNX Runtime session
//! settings, and the validation trait they share.

pub mod detector;
pub mod errors;
pub mod onnx;

pub use detector::{DetectorConfig, InputLayout};
pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
