//! Granular traits for the classification pipeline.
//!
//! The detector is assembled from two seams:
//! - **PixelSource**: anything that can hand out packed ARGB pixels (a platform
//!   bitmap, an `image` buffer, a test fixture)
//! - **InferenceEngine**: anything that can turn an input tensor into class
//!   scores (ONNX Runtime, a mock, another backend)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────────┐    ┌─────────────┐    ┌──────────────┐
//! │PixelSource  │───▶│Preprocessor  │───▶│InferenceEng │───▶│DecisionRule  │
//! │             │    │              │    │             │    │              │
//! │• width      │    │• prepare     │    │• infer      │    │• interpret   │
//! │• height     │    │• validate    │    │• engine_info│    │              │
//! │• packed_px  │    │              │    │             │    │              │
//! └─────────────┘    └──────────────┘    └─────────────┘    └──────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use digits_detector::core::traits::PixelSource;
//!
//! #[derive(Debug)]
//! struct Checkerboard;
//!
//! impl PixelSource for Checkerboard {
//!     fn width(&self) -> u32 { 28 }
//!     fn height(&self) -> u32 { 28 }
//!     fn packed_pixel(&self, x: u32, y: u32) -> u32 {
//!         if (x + y) % 2 == 0 { 0xFFFF_FFFF } else { 0xFF00_0000 }
//!     }
//! }
//!
//! assert_eq!(Checkerboard.packed_pixel(1, 0) & 0xFF, 0);
//! ```

use crate::core::errors::DetectorResult;
use crate::core::tensor::{InputTensor, OutputVector};
use std::fmt::Debug;

/// Read access to an image as packed `0xAARRGGBB` pixels.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Packed colour of the pixel at column `x`, row `y`.
    ///
    /// Callers only ask for coordinates inside `width() x height()`.
    fn packed_pixel(&self, x: u32, y: u32) -> u32;

    /// Dimensions as `(width, height)`.
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        (**self).packed_pixel(x, y)
    }
}

/// Trait for inference engine operations.
///
/// An engine owns a loaded model and runs one forward pass per call. It must be
/// shareable across threads; implementations that need exclusive access to the
/// underlying runtime guard it internally.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Runs the model on `input` and overwrites `output` with the class scores.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::DetectorError::Inference`] when the runtime fails
    /// or produces scores that do not fit `output`.
    fn infer(&self, input: &InputTensor, output: &mut OutputVector) -> DetectorResult<()>;

    /// Name of the loaded model, used in logs and errors.
    fn model_name(&self) -> &str;

    /// Get information about the inference engine.
    fn engine_info(&self) -> String {
        format!("{} (unknown backend)", self.model_name())
    }
}
