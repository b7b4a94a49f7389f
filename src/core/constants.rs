//! Constants describing the MNIST model contract.
//!
//! The classifier consumes a single 28x28 grayscale image and produces one
//! score per digit class. These values define the shape of the reusable input
//! and output buffers.

/// Number of images fed to the model per forward pass.
pub const DIM_BATCH_SIZE: usize = 1;

/// Width of the model input image in pixels.
pub const DIM_IMG_SIZE_X: usize = 28;

/// Height of the model input image in pixels.
pub const DIM_IMG_SIZE_Y: usize = 28;

/// Number of channels per pixel.
pub const DIM_PIXEL_SIZE: usize = 1;

/// Number of output classes (the digits 0 through 9).
pub const NUMBER_LENGTH: usize = 10;

/// Model file name used when no path is configured.
pub const DEFAULT_MODEL_PATH: &str = "mnist.onnx";

/// Model name reported in errors and logs when none is configured.
pub const DEFAULT_MODEL_NAME: &str = "mnist";

/// Integer code returned for an image that matched no class.
pub const UNRECOGNIZED_DIGIT: i32 = -1;

/// Score the exact-match decision rule looks for.
pub const EXACT_MATCH_SCORE: f32 = 1.0;
