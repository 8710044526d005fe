//! Filter that keeps purely alphabetic tokens.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Drops every token that is not made of letters only.
///
/// Numbers, alphanumeric codes such as `498a`, contractions and punctuation
/// are all removed.
#[derive(Clone, Debug, Default)]
pub struct AlphabeticFilter;

impl AlphabeticFilter {
    /// Create a new alphabetic filter.
    pub fn new() -> Self {
        AlphabeticFilter
    }
}

impl Filter for AlphabeticFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .filter(|token| token.is_alphabetic())
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "alphabetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_alphabetic_filter() {
        let filter = AlphabeticFilter::new();
        let tokens = vec![
            Token::new("robbed", 0),
            Token::new("2023", 1),
            Token::new("498a", 2),
            Token::new("don't", 3),
            Token::new("gunpoint", 4),
        ];

        let result: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(result, vec!["robbed", "gunpoint"]);
    }
}
