//! Turning class scores into a digit.
//!
//! Three rules are available:
//!
//! - [`DecisionRule::ArgMax`] (default): the highest score wins, lowest index on ties.
//! - [`DecisionRule::ExactMatch`]: the first class scoring exactly `1.0`. Real
//!   model outputs rarely hit `1.0` exactly, so this rule reports
//!   [`Classification::Unrecognized`] for most inputs. It exists for parity
//!   with models whose last layer is a hard one-hot.
//! - [`DecisionRule::Threshold`]: arg-max, rejected when the winning score is
//!   below a minimum.

use crate::core::constants::{EXACT_MATCH_SCORE, UNRECOGNIZED_DIGIT};
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::tensor::OutputVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of classifying one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The recognized digit, 0 through 9.
    Digit(u8),
    /// No class satisfied the decision rule.
    Unrecognized,
}

impl Classification {
    /// Integer form: the digit, or `-1` when unrecognized.
    pub fn code(&self) -> i32 {
        match self {
            Self::Digit(d) => i32::from(*d),
            Self::Unrecognized => UNRECOGNIZED_DIGIT,
        }
    }

    /// Builds a classification from its integer form.
    ///
    /// Any code outside `0..=9` maps to [`Classification::Unrecognized`].
    pub fn from_code(code: i32) -> Self {
        u8::try_from(code)
            .ok()
            .filter(|d| *d <= 9)
            .map_or(Self::Unrecognized, Self::Digit)
    }

    /// The digit, if one was recognized.
    pub fn digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            Self::Unrecognized => None,
        }
    }

    /// Whether a digit was recognized.
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    fn from_index(index: usize) -> Self {
        u8::try_from(index).map_or(Self::Unrecognized, Self::Digit)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

impl From<Classification> for i32 {
    fn from(value: Classification) -> Self {
        value.code()
    }
}

/// A classification together with the raw scores it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitPrediction {
    /// The decision.
    pub classification: Classification,
    /// Per-class scores of the first batch row, index = digit.
    pub scores: Vec<f32>,
}

impl DigitPrediction {
    /// A prediction for which no inference ran.
    pub fn unrecognized() -> Self {
        Self {
            classification: Classification::Unrecognized,
            scores: Vec::new(),
        }
    }

    /// Score of the recognized digit, if any.
    pub fn confidence(&self) -> Option<f32> {
        self.classification
            .digit()
            .and_then(|d| self.scores.get(usize::from(d)).copied())
    }

    /// The `k` best `(digit, score)` pairs, best first.
    pub fn top_k(&self, k: usize) -> Vec<(usize, f32)> {
        ranked_scores(&self.scores, k)
    }
}

/// Rule for picking a class from a score vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionRule {
    /// Highest score wins; ties go to the lowest index.
    #[default]
    ArgMax,
    /// First class whose score is exactly `1.0`.
    ExactMatch,
    /// Arg-max, rejected when the winning score is below `min_score`.
    Threshold {
        /// Minimum winning score.
        min_score: f32,
    },
}

impl DecisionRule {
    /// Checks that a threshold lies in `0.0..=1.0`; NaN is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] for an out-of-range threshold.
    pub fn validate(&self) -> DetectorResult<()> {
        match self {
            Self::Threshold { min_score } if !(0.0..=1.0).contains(min_score) => {
                Err(DetectorError::config_error(format!(
                    "decision rule threshold must be between 0.0 and 1.0, got {}",
                    min_score
                )))
            }
            _ => Ok(()),
        }
    }

    /// Applies the rule to the first row of `output`.
    pub fn interpret(&self, output: &OutputVector) -> Classification {
        let row = output.first_row();
        self.interpret_scores(row.iter().copied())
    }

    /// Applies the rule to a sequence of scores in class order.
    pub fn interpret_scores(&self, scores: impl IntoIterator<Item = f32>) -> Classification {
        match self {
            Self::ExactMatch => scores
                .into_iter()
                .position(|score| score == EXACT_MATCH_SCORE)
                .map_or(Classification::Unrecognized, Classification::from_index),
            Self::ArgMax => argmax(scores)
                .map_or(Classification::Unrecognized, |(index, _)| {
                    Classification::from_index(index)
                }),
            Self::Threshold { min_score } => match argmax(scores) {
                Some((index, score)) if score >= *min_score => Classification::from_index(index),
                _ => Classification::Unrecognized,
            },
        }
    }
}

/// Index and value of the largest non-NaN score; the first one wins ties.
pub fn argmax(scores: impl IntoIterator<Item = f32>) -> Option<(usize, f32)> {
    scores
        .into_iter()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}

/// The `k` highest non-NaN scores as `(index, score)` pairs, best first.
///
/// Equal scores keep their index order.
pub fn ranked_scores(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot(k: usize) -> Vec<f32> {
        (0..10).map(|i| if i == k { 1.0 } else { 0.0 }).collect()
    }

    fn soft_scores() -> Vec<f32> {
        vec![0.12, 0.81, 0.05, 0.0, 0.0, 0.0, 0.0, 0.02, 0.0, 0.0]
    }

    #[test]
    fn test_one_hot_agrees_across_rules() {
        for k in 0..10 {
            let expected = Classification::Digit(k as u8);
            assert_eq!(DecisionRule::ExactMatch.interpret_scores(one_hot(k)), expected);
            assert_eq!(DecisionRule::ArgMax.interpret_scores(one_hot(k)), expected);
        }
    }

    #[test]
    fn test_soft_scores_exact_match_is_unrecognized() {
        let result = DecisionRule::ExactMatch.interpret_scores(soft_scores());
        assert_eq!(result, Classification::Unrecognized);
        assert_eq!(result.code(), -1);
    }

    #[test]
    fn test_soft_scores_argmax_picks_best() {
        let result = DecisionRule::ArgMax.interpret_scores(soft_scores());
        assert_eq!(result, Classification::Digit(1));
        assert_eq!(result.code(), 1);
    }

    #[test]
    fn test_exact_match_returns_first_match() {
        let mut scores = one_hot(3);
        scores[7] = 1.0;
        assert_eq!(
            DecisionRule::ExactMatch.interpret_scores(scores),
            Classification::Digit(3)
        );
    }

    #[test]
    fn test_argmax_ties_go_to_lowest_index() {
        let scores = vec![0.1, 0.4, 0.1, 0.4, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(
            DecisionRule::ArgMax.interpret_scores(scores),
            Classification::Digit(1)
        );
    }

    #[test]
    fn test_argmax_skips_nan() {
        let scores = vec![f32::NAN, 0.2, 0.7, f32::NAN, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(argmax(scores.clone()), Some((2, 0.7)));
        assert_eq!(
            DecisionRule::ArgMax.interpret_scores(vec![f32::NAN; 10]),
            Classification::Unrecognized
        );
    }

    #[test]
    fn test_argmax_handles_negative_logits() {
        let scores = vec![-3.0, -1.5, -7.0, -0.5, -2.0, -9.0, -4.0, -8.0, -6.0, -5.0];
        assert_eq!(
            DecisionRule::ArgMax.interpret_scores(scores),
            Classification::Digit(3)
        );
    }

    #[test]
    fn test_threshold_rule() {
        let rule = DecisionRule::Threshold { min_score: 0.9 };
        assert_eq!(rule.interpret_scores(soft_scores()), Classification::Unrecognized);

        let rule = DecisionRule::Threshold { min_score: 0.8 };
        assert_eq!(rule.interpret_scores(soft_scores()), Classification::Digit(1));
    }

    #[test]
    fn test_interpret_reads_first_row() {
        let mut output = OutputVector::new();
        output.copy_from(&one_hot(6)).unwrap();
        assert_eq!(DecisionRule::default().interpret(&output), Classification::Digit(6));
    }

    #[test]
    fn test_empty_scores_are_unrecognized() {
        assert_eq!(
            DecisionRule::ArgMax.interpret_scores(Vec::new()),
            Classification::Unrecognized
        );
        assert_eq!(
            DecisionRule::ExactMatch.interpret_scores(Vec::new()),
            Classification::Unrecognized
        );
    }

    #[test]
    fn test_classification_codes() {
        assert_eq!(Classification::from_code(7), Classification::Digit(7));
        assert_eq!(Classification::from_code(-1), Classification::Unrecognized);
        assert_eq!(Classification::from_code(10), Classification::Unrecognized);
        assert_eq!(i32::from(Classification::Digit(0)), 0);
        assert_eq!(Classification::Unrecognized.to_string(), "unrecognized");
        assert_eq!(Classification::Digit(4).to_string(), "4");
    }

    #[test]
    fn test_prediction_confidence_and_top_k() {
        let prediction = DigitPrediction {
            classification: Classification::Digit(1),
            scores: soft_scores(),
        };
        assert_eq!(prediction.confidence(), Some(0.81));
        assert_eq!(prediction.top_k(2), vec![(1, 0.81), (0, 0.12)]);
        assert_eq!(DigitPrediction::unrecognized().confidence(), None);
    }

    #[test]
    fn test_validate_threshold_range() {
        assert!(DecisionRule::ArgMax.validate().is_ok());
        assert!(DecisionRule::ExactMatch.validate().is_ok());
        assert!(DecisionRule::Threshold { min_score: 0.0 }.validate().is_ok());
        assert!(DecisionRule::Threshold { min_score: 1.0 }.validate().is_ok());

        for min_score in [f32::NAN, -0.1, 1.5] {
            let err = DecisionRule::Threshold { min_score }.validate().unwrap_err();
            assert!(matches!(err, DetectorError::Config { .. }));
        }
    }

    #[test]
    fn test_decision_rule_serde() {
        let rule: DecisionRule =
            serde_json::from_str(r#"{"type": "threshold", "min_score": 0.5}"#).unwrap();
        assert_eq!(rule, DecisionRule::Threshold { min_score: 0.5 });
        assert_eq!(
            serde_json::to_string(&DecisionRule::ArgMax).unwrap(),
            r#"{"type":"arg_max"}"#
        );
    }
}
