//! Token filters transform token streams.
//!
//! The English normalization chain is, in order:
//! [`lowercase::LowercaseFilter`], [`alphabetic::AlphabeticFilter`],
//! [`stop::StopFilter`] and [`lemma::LemmaFilter`].

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// Filters receive a stream of tokens and produce a new stream, allowing them
/// to modify or drop tokens.
///
/// # Examples
///
/// ```
/// use statute_classifier::analysis::token::{Token, TokenStream};
/// use statute_classifier::analysis::token_filter::Filter;
/// use statute_classifier::error::Result;
///
/// struct ReverseFilter;
///
/// impl Filter for ReverseFilter {
///     fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
///         let reversed: Vec<Token> = tokens
///             .map(|t| {
///                 let text: String = t.text.chars().rev().collect();
///                 t.with_text(text)
///             })
///             .collect();
///         Ok(Box::new(reversed.into_iter()))
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod alphabetic;
pub mod lemma;
pub mod lowercase;
pub mod stop;
