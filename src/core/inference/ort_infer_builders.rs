use super::*;
use crate::core::config::DetectorConfig;
use crate::core::errors::DetectorResult;
use crate::core::inference::session::load_session;
use std::path::Path;
use tracing::{debug, info};

impl OrtInfer {
    /// Loads the model at `model_path` with default settings and a single session.
    pub fn new(model_path: impl AsRef<Path>) -> DetectorResult<Self> {
        let config = DetectorConfig::new(model_path.as_ref());
        let artifact = ModelArtifact::open(&config.model_path)?;
        Self::from_artifact(artifact, &config)
    }

    /// Creates the engine from an already loaded artifact.
    ///
    /// Opens `session_pool_size` sessions, then resolves the input and output
    /// tensor names, either from the configuration or from the model's first
    /// declared input and output. The engine takes ownership of the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelLoad`] if ONNX Runtime rejects the model,
    /// if the model declares no inputs or outputs, or if a configured tensor
    /// name does not exist in the model.
    pub fn from_artifact(artifact: ModelArtifact, config: &DetectorConfig) -> DetectorResult<Self> {
        let pool_size = config.session_pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(load_session(&artifact, config.ort_session.as_ref())?);
        }

        let (input_name, output_name) = {
            let first = &sessions[0];
            let inputs: Vec<&str> = first.inputs.iter().map(|i| i.name.as_str()).collect();
            let outputs: Vec<&str> = first.outputs.iter().map(|o| o.name.as_str()).collect();
            (
                resolve_tensor_name(&artifact, "input", config.input_name.as_deref(), &inputs)?,
                resolve_tensor_name(&artifact, "output", config.output_name.as_deref(), &outputs)?,
            )
        };

        let model_name = config
            .model_name
            .clone()
            .unwrap_or_else(|| artifact.name().to_string());

        info!(
            "loaded model '{}' ({} bytes, {} session(s))",
            model_name,
            artifact.len(),
            pool_size
        );
        debug!(
            "model '{}' reads '{}' ({:?}) and writes '{}'",
            model_name, input_name, config.input_layout, output_name
        );

        Ok(OrtInfer {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            input_layout: config.input_layout,
            model_name,
            artifact,
        })
    }
}

pub(super) fn resolve_tensor_name(
    artifact: &ModelArtifact,
    kind: &str,
    configured: Option<&str>,
    available: &[&str],
) -> DetectorResult<String> {
    match configured {
        Some(name) if available.contains(&name) => Ok(name.to_string()),
        Some(name) => Err(DetectorError::model_load_error(
            artifact.label(),
            format!(
                "model has no {} tensor named '{}' (available: {:?})",
                kind, name, available
            ),
            Some("fix the tensor name in the detector configuration"),
            None::<std::io::Error>,
        )),
        None => available.first().map(|s| s.to_string()).ok_or_else(|| {
            DetectorError::model_load_error(
                artifact.label(),
                format!("model declares no {} tensors", kind),
                None,
                None::<std::io::Error>,
            )
        }),
    }
}
