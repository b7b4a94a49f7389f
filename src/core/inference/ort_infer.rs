//! ONNX Runtime inference engine with a small pool of sessions.

use super::artifact::ModelArtifact;
use crate::core::config::InputLayout;
use crate::core::errors::DetectorError;
use ort::session::Session;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// Runs the digit model through ONNX Runtime.
///
/// Each session sits behind its own mutex and calls are spread round-robin, so
/// the engine can be shared between threads. The artifact is kept alive for as
/// long as the engine exists.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: String,
    pub(super) input_layout: InputLayout,
    pub(super) model_name: String,
    pub(super) artifact: ModelArtifact,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_layout", &self.input_layout)
            .field("model_name", &self.model_name)
            .field("artifact", &self.artifact)
            .finish()
    }
}

impl OrtInfer {
    /// Name of the input tensor fed on every call.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Name of the output tensor read on every call.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Number of sessions in the pool.
    pub fn session_pool_size(&self) -> usize {
        self.sessions.len()
    }

    /// The model artifact backing the sessions.
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Declared layout of the input tensor.
    pub fn input_layout(&self) -> InputLayout {
        self.input_layout
    }

    fn lock_error(&self, idx: usize) -> DetectorError {
        DetectorError::inference_message(
            &self.model_name,
            format!(
                "Failed to acquire session lock for session {}/{}",
                idx,
                self.sessions.len()
            ),
        )
    }
}
