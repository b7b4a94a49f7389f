//! Handwritten Digit Classification Example
//!
//! This example loads an MNIST model, fits each input image to 28x28 and
//! prints the recognized digit code (`-1` when unrecognized) together with the
//! top score.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example classify_digit -- [OPTIONS] <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-m, --model-path` - Path to the MNIST model file
//! * `-c, --config` - JSON configuration file (overrides `--model-path`)
//! * `--rule` - Decision rule: `argmax` or `exact`
//! * `--threshold` - Minimum winning score for arg-max
//! * `<IMAGES>...` - Paths to input images
//!
//! # Example
//!
//! ```bash
//! cargo run --example classify_digit -- \
//!     -m models/mnist.onnx \
//!     seven.png three.png
//! ```

use clap::{Parser, ValueEnum};
use digits_detector::core::{DetectorConfig, InferenceEngine};
use digits_detector::models::DigitsDetector;
use digits_detector::processors::DecisionRule;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rule {
    /// Highest score wins
    Argmax,
    /// First class scoring exactly 1.0
    Exact,
}

/// Command-line arguments for the digit classification example
#[derive(Parser)]
#[command(name = "classify_digit")]
#[command(about = "Handwritten Digit Classification Example - recognizes digits 0-9")]
struct Args {
    /// Path to the MNIST model file
    #[arg(short, long, default_value = "mnist.onnx")]
    model_path: PathBuf,

    /// JSON configuration file; replaces the model and rule flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Paths to input images to process
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Decision rule applied to the scores
    #[arg(long, value_enum, default_value = "argmax")]
    rule: Rule,

    /// Minimum winning score; only used with the arg-max rule
    #[arg(long)]
    threshold: Option<f32>,

    /// Session pool size for concurrent inference (default: 1)
    #[arg(long, default_value = "1")]
    session_pool_size: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn decision_rule(&self) -> DecisionRule {
        match (self.rule, self.threshold) {
            (Rule::Exact, Some(_)) => {
                warn!("--threshold is ignored with the exact rule");
                DecisionRule::ExactMatch
            }
            (Rule::Exact, None) => DecisionRule::ExactMatch,
            (Rule::Argmax, Some(min_score)) => DecisionRule::Threshold { min_score },
            (Rule::Argmax, None) => DecisionRule::ArgMax,
        }
    }

    fn detector_config(&self) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config {
            info!("Loading configuration from {}", path.display());
            return Ok(DetectorConfig::from_json_file(path)?);
        }

        let mut config = DetectorConfig::new(self.model_path.clone());
        config.decision_rule = self.decision_rule();
        config.session_pool_size = self.session_pool_size;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    digits_detector::utils::init_tracing();

    let args = Args::parse();

    info!("Handwritten Digit Classification Example");

    let config = args.detector_config()?;

    if !config.model_path.exists() {
        error!("Model file not found: {}", config.model_path.display());
        return Err("Model file not found".into());
    }

    if args.verbose {
        info!("Detector Configuration:");
        info!("  Model: {}", config.model_path.display());
        info!("  Decision rule: {:?}", config.decision_rule);
        info!("  Input layout: {:?}", config.input_layout);
        info!("  Session pool size: {}", config.session_pool_size);
    }

    let detector = DigitsDetector::from_config(config)?;
    info!("Detector built successfully");
    if args.verbose {
        info!("  Engine: {}", detector.engine().engine_info());
    }

    info!("Processing {} images...", args.images.len());
    let mut failures = 0usize;

    for image_path in &args.images {
        let start = Instant::now();
        match detector.classify_path(image_path) {
            Ok(prediction) => {
                let top = prediction.top_k(1).first().map_or(0.0, |(_, score)| *score);
                println!(
                    "{}\t{}\t{:.4}",
                    image_path.display(),
                    prediction.classification.code(),
                    top
                );
                if args.verbose {
                    info!(
                        "  {} classified in {:.2}ms",
                        image_path.display(),
                        start.elapsed().as_secs_f64() * 1000.0
                    );
                    for (rank, (digit, score)) in prediction.top_k(3).iter().enumerate() {
                        info!("    [{}] {} - {:.4}", rank + 1, digit, score);
                    }
                }
            }
            Err(e) => {
                error!("Failed to classify {}: {}", image_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures == args.images.len() {
        return Err("No images could be classified".into());
    }

    Ok(())
}
