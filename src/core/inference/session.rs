//! Helpers for creating ONNX Runtime sessions from model artifacts.

use super::artifact::ModelArtifact;
use crate::core::config::{OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{DetectorError, DetectorResult};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};

/// Creates a session from the artifact's bytes, applying `config` when given.
///
/// Runtime logging defaults to errors only.
pub fn load_session(
    artifact: &ModelArtifact,
    config: Option<&OrtSessionConfig>,
) -> DetectorResult<Session> {
    let builder = Session::builder().map_err(|e| {
        session_error(
            artifact,
            "failed to create ONNX session builder",
            "check that the ONNX Runtime library can be loaded",
            e,
        )
    })?;
    let builder = match config {
        Some(cfg) => apply_ort_config(builder, cfg),
        None => builder.with_log_level(LogLevel::Error),
    }
    .map_err(|e| {
        session_error(
            artifact,
            "failed to configure ONNX session",
            "check the ort_session settings",
            e,
        )
    })?;

    builder.commit_from_memory(artifact.as_bytes()).map_err(|e| {
        session_error(
            artifact,
            "failed to create ONNX session",
            "verify the file is an ONNX export of the digit classifier",
            e,
        )
    })
}

/// Every runtime failure while opening a session is a model load failure.
fn session_error(
    artifact: &ModelArtifact,
    reason: &str,
    suggestion: &str,
    error: ort::Error,
) -> DetectorError {
    DetectorError::model_load_error(artifact.label(), reason, Some(suggestion), Some(error))
}

fn apply_ort_config(
    mut builder: SessionBuilder,
    cfg: &OrtSessionConfig,
) -> Result<SessionBuilder, ort::Error> {
    if let Some(threads) = cfg.intra_threads {
        builder = builder.with_intra_threads(threads)?;
    }
    if let Some(threads) = cfg.inter_threads {
        builder = builder.with_inter_threads(threads)?;
    }
    if let Some(level) = cfg.optimization_level {
        builder = builder.with_optimization_level(graph_optimization_level(level))?;
    }
    builder.with_log_level(log_level(cfg.log_severity_level))
}

fn graph_optimization_level(level: OrtGraphOptimizationLevel) -> GraphOptimizationLevel {
    match level {
        OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
        OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
    }
}

fn log_level(severity: Option<i32>) -> LogLevel {
    match severity {
        Some(0) => LogLevel::Verbose,
        Some(1) => LogLevel::Info,
        Some(2) => LogLevel::Warning,
        Some(4) => LogLevel::Fatal,
        _ => LogLevel::Error,
    }
}
