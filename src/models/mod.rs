//! Model adapters.
//!
//! Each adapter wraps an inference engine together with the pre- and
//! post-processing needed to turn caller data into a typed result.

pub mod classification;

pub use classification::*;
