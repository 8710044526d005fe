//! # statute-classifier
//!
//! Maps free-text incident descriptions to statute section codes.
//!
//! ## Features
//!
//! - Linguistic normalization with a lowercase fallback
//! - TF-IDF features and a multinomial naive Bayes model
//! - Keyword rules as a second opinion
//! - Checksummed model persistence with hot replacement on retrain

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod normalizer;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
