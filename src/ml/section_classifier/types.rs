//! Common types for section classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque statute section identifier such as `379` or `498A`.
///
/// Codes compare by value and order lexicographically by bytes, so `302`
/// sorts before `323` and `498A` before `66D`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionCode(String);

impl SectionCode {
    /// Create a section code.
    pub fn new<S: Into<String>>(code: S) -> Self {
        SectionCode(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionCode {
    fn from(code: &str) -> Self {
        SectionCode::new(code)
    }
}

impl PartialEq<&str> for SectionCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Training example: an incident description and its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledExample {
    /// Incident description.
    pub text: &'static str,
    /// Section code label.
    pub section: &'static str,
}

impl LabeledExample {
    /// Create a labeled example.
    pub const fn new(text: &'static str, section: &'static str) -> Self {
        LabeledExample { text, section }
    }

    /// Get the label as a section code.
    pub fn section_code(&self) -> SectionCode {
        SectionCode::new(self.section)
    }
}

/// A section suggestion from one classification branch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    /// Suggested section, if any.
    pub section: Option<SectionCode>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Candidate {
    /// Create a candidate for a section.
    pub fn new(section: SectionCode, confidence: f64) -> Self {
        Candidate {
            section: Some(section),
            confidence,
        }
    }

    /// The empty candidate `(None, 0.0)`.
    pub fn empty() -> Self {
        Candidate::default()
    }

    /// Whether the candidate names a section.
    pub fn is_empty(&self) -> bool {
        self.section.is_none()
    }
}

/// Which branch produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMethod {
    /// The statistical classifier.
    Ml,
    /// The keyword rule table.
    Keyword,
    /// Neither branch was confident.
    None,
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionMethod::Ml => "ml",
            PredictionMethod::Keyword => "keyword",
            PredictionMethod::None => "none",
        };
        f.write_str(name)
    }
}

/// Final outcome of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted section, absent when nothing was confident enough.
    pub section: Option<SectionCode>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Branch that produced the result.
    pub method: PredictionMethod,
    /// Advisory message for unconfident results.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl PredictionResult {
    /// Whether a section was predicted.
    pub fn is_confident(&self) -> bool {
        self.section.is_some()
    }
}
