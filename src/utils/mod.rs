//! Utility functions for the digit detector.
//!
//! This module provides image helpers (packed bitmaps, loading, fitting to the
//! model input) and logging setup.

pub mod image;

pub use self::image::{PackedBitmap, fit_to_model_input, load_image, pack_argb};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
