//! Lowercase filter.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Stopped tokens are passed through untouched.
///
/// # Examples
///
/// ```
/// use statute_classifier::analysis::token_filter::Filter;
/// use statute_classifier::analysis::token_filter::lowercase::LowercaseFilter;
/// use statute_classifier::analysis::token::Token;
///
/// let filter = LowercaseFilter::new();
/// let tokens = vec![Token::new("Someone", 0), Token::new("STOLE", 1)];
///
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .collect();
///
/// assert_eq!(result[0].text, "someone");
/// assert_eq!(result[1].text, "stole");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let lowered = token.text.to_lowercase();
                    token.with_text(lowered)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn lower(words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        LowercaseFilter::new()
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_mixed_case_incident() {
        assert_eq!(
            lower(&["Husband", "DEMANDED", "Dowry"]),
            vec!["husband", "demanded", "dowry"]
        );
    }

    #[test]
    fn test_non_ascii_and_codes() {
        assert_eq!(lower(&["ÉCOLE", "498A", "66D"]), vec!["école", "498a", "66d"]);
    }

    #[test]
    fn test_stopped_token_untouched() {
        let tokens = vec![Token::new("Phone", 0), Token::new("The", 1).stop()];
        let result: Vec<Token> = LowercaseFilter::new()
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();
        assert_eq!(result[0].text, "phone");
        assert_eq!(result[1].text, "The");
    }
}
