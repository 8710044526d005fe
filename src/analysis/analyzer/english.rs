//! English analyzer producing lemmatized content words.
//!
//! # Pipeline
//!
//! 1. UnicodeWordTokenizer
//! 2. LowercaseFilter
//! 3. AlphabeticFilter
//! 4. StopFilter (English function words)
//! 5. LemmaFilter
//!
//! # Examples
//!
//! ```
//! use statute_classifier::analysis::analyzer::Analyzer;
//! use statute_classifier::analysis::analyzer::english::EnglishAnalyzer;
//!
//! let analyzer = EnglishAnalyzer::new();
//! let terms = analyzer.terms("Someone stole my phone!").unwrap();
//! assert_eq!(terms, vec!["steal", "phone"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::alphabetic::AlphabeticFilter;
use crate::analysis::token_filter::lemma::LemmaFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::Result;

/// Analyzer that keeps lemmas of alphabetic, non-stopword tokens.
pub struct EnglishAnalyzer {
    inner: PipelineAnalyzer,
}

impl EnglishAnalyzer {
    /// Create a new English analyzer.
    pub fn new() -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(AlphabeticFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(LemmaFilter::new()))
            .with_name("english");

        EnglishAnalyzer { inner: analyzer }
    }

    /// Analyze text and collect the resulting term texts.
    pub fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Default for EnglishAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for EnglishAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

impl std::fmt::Debug for EnglishAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
