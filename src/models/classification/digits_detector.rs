//! Handwritten digit detector.
//!
//! [`DigitsDetector`] ties the pieces together: it owns an inference engine,
//! one reusable input tensor and one reusable score buffer, and runs
//! pre-process -> infer -> decide for each call.

use crate::core::config::{ConfigValidator, DetectorConfig, InputLayout, OrtSessionConfig};
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::inference::{ModelArtifact, OrtInfer};
use crate::core::tensor::{InputTensor, OutputVector};
use crate::core::traits::{InferenceEngine, PixelSource};
use crate::processors::{Classification, DecisionRule, DigitPrediction, DigitPreprocessor};
use crate::utils::image::{fit_to_model_input, load_image};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug)]
struct Buffers {
    input: InputTensor,
    output: OutputVector,
}

/// Classifies 28x28 bitmaps into the digits 0-9.
///
/// The detector is `Send + Sync` when its engine is. Calls from several threads
/// are serialized on the shared buffers; each call runs to completion.
#[derive(Debug)]
pub struct DigitsDetector<E: InferenceEngine = OrtInfer> {
    engine: E,
    preprocessor: DigitPreprocessor,
    rule: DecisionRule,
    buffers: Mutex<Buffers>,
}

impl DigitsDetector<OrtInfer> {
    /// Loads the model at `model_path` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelLoad`] if the model cannot be loaded. No
    /// detector exists in that case.
    pub fn new(model_path: impl AsRef<Path>) -> DetectorResult<Self> {
        DigitsDetectorBuilder::new()
            .model_path(model_path.as_ref())
            .build()
    }

    /// Builds a detector from a full configuration.
    pub fn from_config(config: DetectorConfig) -> DetectorResult<Self> {
        DigitsDetectorBuilder::new().with_config(config).build()
    }

    /// Builds a detector from model bytes that are already in memory.
    pub fn from_artifact(artifact: ModelArtifact, config: &DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        let engine = OrtInfer::from_artifact(artifact, config)?;
        Self::with_engine(engine, config.decision_rule)
    }
}

impl<E: InferenceEngine> DigitsDetector<E> {
    /// Wraps an already constructed engine.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] if `rule` has a threshold outside
    /// `0.0..=1.0`.
    pub fn with_engine(engine: E, rule: DecisionRule) -> DetectorResult<Self> {
        rule.validate()?;
        debug!("digits detector using {}", engine.engine_info());
        Ok(Self {
            engine,
            preprocessor: DigitPreprocessor::new(),
            rule,
            buffers: Mutex::new(Buffers {
                input: InputTensor::new(),
                output: OutputVector::new(),
            }),
        })
    }

    /// The inference engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The decision rule applied to the scores.
    pub fn decision_rule(&self) -> DecisionRule {
        self.rule
    }

    /// Replaces the decision rule; an invalid rule leaves the current one.
    pub fn set_decision_rule(&mut self, rule: DecisionRule) -> DetectorResult<()> {
        rule.validate()?;
        self.rule = rule;
        Ok(())
    }

    /// Classifies one 28x28 image.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::InvalidInput`] for an image of the wrong size
    /// and [`DetectorError::Inference`] if the engine fails.
    pub fn classify<I: PixelSource + ?Sized>(&self, image: &I) -> DetectorResult<Classification> {
        self.classify_with_scores(image)
            .map(|prediction| prediction.classification)
    }

    /// Classifies an image that may be absent.
    ///
    /// `None` yields [`Classification::Unrecognized`] without running the model.
    pub fn classify_optional<I: PixelSource + ?Sized>(
        &self,
        image: Option<&I>,
    ) -> DetectorResult<Classification> {
        self.run(image).map(|prediction| prediction.classification)
    }

    /// Classifies one image and returns the scores alongside the decision.
    pub fn classify_with_scores<I: PixelSource + ?Sized>(
        &self,
        image: &I,
    ) -> DetectorResult<DigitPrediction> {
        self.run(Some(image))
    }

    /// Loads an image file, fits it to 28x28 and classifies it.
    pub fn classify_path(&self, path: impl AsRef<Path>) -> DetectorResult<DigitPrediction> {
        let image = load_image(path.as_ref())?;
        let fitted = fit_to_model_input(&image);
        self.classify_with_scores(&fitted)
    }

    fn run<I: PixelSource + ?Sized>(&self, image: Option<&I>) -> DetectorResult<DigitPrediction> {
        let mut guard = self.buffers.lock().map_err(|_| {
            DetectorError::inference_message(
                self.engine.model_name(),
                "classification buffers are poisoned by an earlier panic",
            )
        })?;
        let Buffers { input, output } = &mut *guard;

        if !self.preprocessor.prepare(image, input)? {
            warn!("no image supplied; skipping classification");
            return Ok(DigitPrediction::unrecognized());
        }

        self.engine.infer(input, output)?;

        let classification = self.rule.interpret(output);
        debug!(
            "model '{}' classified image as {} ({:?})",
            self.engine.model_name(),
            classification,
            self.rule
        );

        Ok(DigitPrediction {
            classification,
            scores: output.first_row().to_vec(),
        })
    }
}

/// Builder for [`DigitsDetector`] backed by ONNX Runtime.
#[derive(Debug, Default)]
pub struct DigitsDetectorBuilder {
    config: DetectorConfig,
}

impl DigitsDetectorBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the model file path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    /// Sets the model name used in logs and errors.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.config.model_name = Some(name.into());
        self
    }

    /// Sets the decision rule.
    pub fn decision_rule(mut self, rule: DecisionRule) -> Self {
        self.config.decision_rule = rule;
        self
    }

    /// Sets the input tensor name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.config.input_name = Some(name.into());
        self
    }

    /// Sets the output tensor name.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = Some(name.into());
        self
    }

    /// Sets the declared input layout.
    pub fn input_layout(mut self, layout: InputLayout) -> Self {
        self.config.input_layout = layout;
        self
    }

    /// Sets the session pool size for ONNX Runtime.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.config.session_pool_size = size;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.config.ort_session = Some(config);
        self
    }

    /// The configuration that `build` will use.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Validates the configuration, loads the model and builds the detector.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] for an invalid configuration and
    /// [`DetectorError::ModelLoad`] if the model cannot be loaded.
    pub fn build(self) -> DetectorResult<DigitsDetector<OrtInfer>> {
        self.config.validate()?;
        let artifact = ModelArtifact::open(&self.config.model_path)?;
        DigitsDetector::from_artifact(artifact, &self.config)
    }
}
