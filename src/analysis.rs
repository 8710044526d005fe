//! Text analysis: tokenization, token filters and analysis pipelines.
//!
//! The [`analyzer::english::EnglishAnalyzer`] reduces free text to lemmatized
//! content words and backs the linguistic mode of
//! [`crate::normalizer::TextNormalizer`]. The [`tokenizer::regex::RegexTokenizer`]
//! extracts the terms the TF-IDF vectorizer counts.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
