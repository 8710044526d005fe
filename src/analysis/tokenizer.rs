//! Tokenizers split raw text into a stream of tokens.
//!
//! - [`unicode_word::UnicodeWordTokenizer`] splits on UAX #29 word boundaries
//!   and is what the linguistic normalizer uses.
//! - [`regex::RegexTokenizer`] extracts regex matches and is what the TF-IDF
//!   vectorizer uses to pick out its terms.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so tokenizers can be shared by the
/// parallel training pass.
///
/// # Examples
///
/// ```
/// use statute_classifier::analysis::token::{Token, TokenStream};
/// use statute_classifier::analysis::tokenizer::Tokenizer;
/// use statute_classifier::error::Result;
///
/// struct CommaTokenizer;
///
/// impl Tokenizer for CommaTokenizer {
///     fn tokenize(&self, text: &str) -> Result<TokenStream> {
///         let tokens: Vec<Token> = text
///             .split(',')
///             .enumerate()
///             .map(|(i, s)| Token::new(s.trim(), i))
///             .collect();
///         Ok(Box::new(tokens.into_iter()))
///     }
///
///     fn name(&self) -> &'static str {
///         "comma"
///     }
/// }
/// ```
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod unicode_word;
