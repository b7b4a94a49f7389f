//! The core module of the digit detector.
//!
//! This module contains the building blocks the detector is assembled from:
//! - Model dimensions and other constants
//! - Configuration and validation
//! - Error handling
//! - Model loading and the ONNX Runtime backend
//! - Reusable input/output buffers
//! - Traits for pixel sources and inference engines

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod tensor;
pub mod traits;

pub use config::{ConfigError, ConfigValidator, DetectorConfig, InputLayout, OrtSessionConfig};
pub use constants::*;
pub use errors::{DetectorError, DetectorResult, SimpleError};
pub use inference::{ModelArtifact, OrtInfer, load_session};
pub use tensor::{InputTensor, OutputVector, Tensor2D, Tensor4D};
pub use traits::{InferenceEngine, PixelSource};
