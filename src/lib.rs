//! # Digits Detector
//!
//! A Rust library that recognizes handwritten digits in 28x28 bitmaps using an
//! MNIST-trained ONNX model.
//!
//! ## Features
//!
//! - Memory-mapped model loading
//! - Blue-channel inversion of packed `0xAARRGGBB` pixels into the model input
//! - Configurable decision rule (arg-max, exact match, thresholded arg-max)
//! - Pluggable inference engine, with ONNX Runtime as the default
//! - JSON configuration
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, tensors, traits and the ONNX Runtime engine
//! * [`models`] - The digit detector and its builder
//! * [`processors`] - Pixel inversion and score interpretation
//! * [`utils`] - Image helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digits_detector::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = DigitsDetectorBuilder::new()
//!     .model_path("models/mnist.onnx")
//!     .decision_rule(DecisionRule::ArgMax)
//!     .build()?;
//!
//! // A blank page: every pixel white.
//! let bitmap = PackedBitmap::filled(28, 28, 0xFFFF_FFFF);
//! let digit = detector.classify(&bitmap)?;
//! println!("digit code: {}", digit.code());
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust,no_run
//! use digits_detector::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DetectorConfig::from_json_str(r#"
//! {
//!   "model_path": "models/mnist.onnx",
//!   "input_layout": "nhwc",
//!   "decision_rule": { "type": "threshold", "min_score": 0.6 },
//!   "session_pool_size": 2
//! }
//! "#)?;
//!
//! let detector = DigitsDetector::from_config(config)?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod models;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use digits_detector::prelude::*;
/// ```
///
/// For lower-level pieces (tensors, the ONNX Runtime engine, model artifacts),
/// import directly from [`crate::core`].
pub mod prelude {
    pub use crate::core::{
        DetectorConfig, DetectorError, DetectorResult, InferenceEngine, InputLayout, PixelSource,
    };
    pub use crate::models::{DigitsDetector, DigitsDetectorBuilder};
    pub use crate::processors::{Classification, DecisionRule, DigitPrediction};
    pub use crate::utils::{PackedBitmap, load_image};
}
