//! Section classifier trait definition.

use super::types::Candidate;
use crate::error::Result;

/// Section classifier trait.
///
/// Each classification branch of the engine implements this trait and
/// returns a [`Candidate`]; the arbiter decides between them.
pub trait SectionClassifier: Send + Sync {
    /// Suggest a section for the given text.
    ///
    /// # Arguments
    /// * `text` - The text to classify, in the form this classifier expects
    ///
    /// # Returns
    /// A candidate, empty when the classifier has no suggestion
    fn classify(&self, text: &str) -> Result<Candidate>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

impl SectionClassifier for super::keyword_classifier::KeywordRuleEngine {
    fn classify(&self, text: &str) -> Result<Candidate> {
        Ok(self.match_text(text))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
