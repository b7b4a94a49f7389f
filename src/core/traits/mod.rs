//! Trait definitions for the classification pipeline.
//!
//! `granular` holds the two seams the detector is generic over: where pixels
//! come from and which runtime executes the model.

pub mod granular;

pub use granular::{InferenceEngine, PixelSource};
