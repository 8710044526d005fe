//! Confidence-based arbitration between the two classification branches.

use log::debug;

use super::types::{Candidate, PredictionMethod, PredictionResult};

/// Minimum statistical confidence for the ML branch to win.
pub const ML_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Message attached to results where neither branch produced a section.
pub const NO_PREDICTION_MESSAGE: &str =
    "Could not confidently predict section. Please provide more details.";

/// Combines the ML and keyword candidates into the final result.
///
/// The ML candidate wins when it names a section with confidence at or above
/// the threshold. Otherwise a keyword match wins at its own confidence, even
/// when that is lower than the rejected ML confidence.
///
/// # Examples
///
/// ```
/// use statute_classifier::ml::section_classifier::{
///     Candidate, DecisionArbiter, PredictionMethod, SectionCode,
/// };
///
/// let arbiter = DecisionArbiter::new();
///
/// let result = arbiter.decide(
///     Candidate::new(SectionCode::new("379"), 0.59),
///     Candidate::new(SectionCode::new("323"), 0.33),
/// );
/// assert_eq!(result.method, PredictionMethod::Keyword);
/// assert_eq!(result.section.unwrap().as_str(), "323");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecisionArbiter {
    threshold: f64,
}

impl DecisionArbiter {
    /// Create an arbiter with the default threshold.
    pub fn new() -> Self {
        DecisionArbiter {
            threshold: ML_CONFIDENCE_THRESHOLD,
        }
    }

    /// Threshold the ML confidence must reach.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide between the ML and keyword candidates.
    pub fn decide(&self, ml: Candidate, keyword: Candidate) -> PredictionResult {
        debug!(
            "Arbitrating ml={:?} ({:.4}) keyword={:?} ({:.4})",
            ml.section, ml.confidence, keyword.section, keyword.confidence
        );

        if ml.confidence >= self.threshold {
            if let Some(section) = ml.section {
                return PredictionResult {
                    section: Some(section),
                    confidence: ml.confidence,
                    method: PredictionMethod::Ml,
                    message: None,
                };
            }
        }

        if let Some(section) = keyword.section {
            return PredictionResult {
                section: Some(section),
                confidence: keyword.confidence,
                method: PredictionMethod::Keyword,
                message: None,
            };
        }

        PredictionResult {
            section: None,
            confidence: 0.0,
            method: PredictionMethod::None,
            message: Some(NO_PREDICTION_MESSAGE.to_string()),
        }
    }
}

impl Default for DecisionArbiter {
    fn default() -> Self {
        Self::new()
    }
}
