//! Reduction of raw incident text to a canonical term sequence.
//!
//! The normalizer runs in one of two modes, chosen once when the engine
//! starts:
//!
//! - with linguistic analysis available, text is lowercased, split on word
//!   boundaries, stripped of stopwords, punctuation and non-alphabetic tokens,
//!   and each remaining word is replaced by its lemma;
//! - without it, text is only lowercased.
//!
//! Normalization never fails. If the analyzer reports an error for some input
//! the normalizer logs it and returns the lowercase form instead.

use std::sync::Arc;

use log::warn;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::english::EnglishAnalyzer;

/// Mode name of the lowercase-only fallback.
pub const LOWERCASE_MODE: &str = "lowercase";

/// The linguistic analysis capability backing a [`TextNormalizer`].
#[derive(Clone)]
pub enum LinguisticCapability {
    /// Full analysis with the given analyzer.
    Available(Arc<dyn Analyzer>),
    /// Lowercase-only fallback.
    Unavailable,
}

impl LinguisticCapability {
    /// Select the capability from a configuration flag.
    pub fn select(enabled: bool) -> Self {
        if enabled {
            LinguisticCapability::Available(Arc::new(EnglishAnalyzer::new()))
        } else {
            warn!("Linguistic analysis disabled, normalizing by lowercasing only");
            LinguisticCapability::Unavailable
        }
    }
}

impl std::fmt::Debug for LinguisticCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinguisticCapability::Available(analyzer) => {
                write!(f, "Available({})", analyzer.name())
            }
            LinguisticCapability::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Text normalizer shared by training and prediction.
///
/// # Examples
///
/// ```
/// use statute_classifier::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::english();
/// assert_eq!(normalizer.normalize("Someone stole my phone"), "steal phone");
///
/// let fallback = TextNormalizer::lowercase_only();
/// assert_eq!(fallback.normalize("Someone STOLE my phone!"), "someone stole my phone!");
/// ```
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    capability: LinguisticCapability,
}

impl TextNormalizer {
    /// Create a normalizer over the given capability.
    pub fn new(capability: LinguisticCapability) -> Self {
        TextNormalizer { capability }
    }

    /// Create a normalizer with English linguistic analysis.
    pub fn english() -> Self {
        Self::new(LinguisticCapability::Available(Arc::new(
            EnglishAnalyzer::new(),
        )))
    }

    /// Create a lowercase-only normalizer.
    pub fn lowercase_only() -> Self {
        Self::new(LinguisticCapability::Unavailable)
    }

    /// Whether linguistic analysis is available.
    pub fn is_available(&self) -> bool {
        matches!(self.capability, LinguisticCapability::Available(_))
    }

    /// Name of the normalization mode: the analyzer name, or `"lowercase"`.
    ///
    /// A model is only valid for text normalized the same way, so the mode
    /// is recorded with every trained vectorizer.
    pub fn mode(&self) -> &'static str {
        match &self.capability {
            LinguisticCapability::Available(analyzer) => analyzer.name(),
            LinguisticCapability::Unavailable => LOWERCASE_MODE,
        }
    }

    /// Get the capability backing this normalizer.
    pub fn capability(&self) -> &LinguisticCapability {
        &self.capability
    }

    /// Normalize text into space-joined lemmas.
    pub fn normalize(&self, text: &str) -> String {
        match &self.capability {
            LinguisticCapability::Available(analyzer) => match analyzer.analyze(text) {
                Ok(tokens) => tokens
                    .map(|token| token.text)
                    .collect::<Vec<_>>()
                    .join(" "),
                Err(e) => {
                    warn!("Analyzer {} failed, lowercasing instead: {e}", analyzer.name());
                    text.to_lowercase()
                }
            },
            LinguisticCapability::Unavailable => text.to_lowercase(),
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}
