//! Classification models.
//!
//! This module contains the handwritten digit detector and its builder.

pub mod digits_detector;

pub use digits_detector::{DigitsDetector, DigitsDetectorBuilder};
