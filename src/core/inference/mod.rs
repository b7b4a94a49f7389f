//! Model loading and the ONNX Runtime backend.
//!
//! [`ModelArtifact`] owns the model bytes; [`OrtInfer`] turns an artifact into a
//! pool of ONNX Runtime sessions and implements
//! [`crate::core::traits::InferenceEngine`].

pub mod artifact;
pub mod ort_infer;
pub mod session;

pub use artifact::ModelArtifact;
pub use ort_infer::OrtInfer;
pub use session::load_session;
