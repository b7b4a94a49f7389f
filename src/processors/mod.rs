//! Pre- and post-processing around the model call.
//!
//! * `pixel_inversion` - Bitmap to input tensor conversion
//! * `decision` - Score vector to digit conversion

pub mod decision;
pub mod pixel_inversion;

pub use decision::{Classification, DecisionRule, DigitPrediction, argmax, ranked_scores};
pub use pixel_inversion::{DigitPreprocessor, invert_blue_channel};
