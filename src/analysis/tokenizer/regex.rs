//! Regex-based tokenizer.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, StatuteError};

/// Pattern used by the TF-IDF vectorizer: runs of two or more word characters.
pub const TERM_PATTERN: &str = r"\b\w\w+\b";

/// A regex-based tokenizer that extracts every match of a pattern as a token.
///
/// # Examples
///
/// ```
/// use statute_classifier::analysis::tokenizer::Tokenizer;
/// use statute_classifier::analysis::tokenizer::regex::RegexTokenizer;
///
/// let tokenizer = RegexTokenizer::terms().unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("a phone was stolen").unwrap().collect();
/// assert_eq!(tokens.len(), 3); // "a" is too short
/// assert_eq!(tokens[0].text, "phone");
/// ```
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default pattern `\w+`.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a tokenizer using [`TERM_PATTERN`].
    pub fn terms() -> Result<Self> {
        Self::with_pattern(TERM_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| StatuteError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| Token::with_offsets(mat.as_str(), position, mat.start(), mat.end()))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
