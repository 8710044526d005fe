//! Hybrid statute section classifier.
//!
//! A free-text incident description is classified by two branches:
//!
//! - a statistical branch: normalized text is vectorized with TF-IDF over
//!   unigrams and bigrams and scored by multinomial naive Bayes;
//! - a keyword branch: a fixed rule table of words and phrases per section.
//!
//! [`DecisionArbiter`] prefers the statistical answer when it is confident
//! and falls back to the keyword rules otherwise.
//!
//! # Architecture
//!
//! - `SectionClassifier` trait: Common interface of both branches
//! - `TfIdfVectorizer`: Feature extraction
//! - `MultinomialNaiveBayes`: Probabilistic classifier
//! - `KeywordRuleEngine`: Keyword rules
//! - `TrainedModel`: A consistent vectorizer/classifier pair
//! - `ModelLifecycle` / `ModelHandle`: Training, persistence and hot swap
//! - `SectionEngine`: Facade exposing predict, retrain, sections and health
//!
//! # Example
//!
//! ```rust,no_run
//! use statute_classifier::config::EngineConfig;
//! use statute_classifier::ml::section_classifier::SectionEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = SectionEngine::from_config(&EngineConfig::default())?;
//! engine.start()?;
//!
//! let result = engine.predict("My husband is demanding dowry")?;
//! println!("{:?} via {}", result.section, result.method);
//! # Ok(())
//! # }
//! ```

mod arbiter;
mod classifier;
mod corpus;
mod engine;
mod keyword_classifier;
mod lifecycle;
mod model;
mod naive_bayes;
mod persistence;
mod tfidf;
mod types;

// Public exports
pub use arbiter::{DecisionArbiter, ML_CONFIDENCE_THRESHOLD, NO_PREDICTION_MESSAGE};
pub use classifier::SectionClassifier;
pub use corpus::{TRAINING_DATA, section_counts, sections};
pub use engine::{HealthStatus, RetrainSummary, SectionEngine};
pub use keyword_classifier::{
    DEFAULT_KEYWORD_RULES, KEYWORD_CONFIDENCE_DENOMINATOR, KeywordRule, KeywordRuleEngine,
    MAX_KEYWORD_CONFIDENCE,
};
pub use lifecycle::{ModelHandle, ModelLifecycle, ModelSource};
pub use model::TrainedModel;
pub use naive_bayes::{ClassPosterior, MultinomialNaiveBayes, NaiveBayesConfig};
pub use persistence::{ArtifactKind, FORMAT_VERSION, ModelStore};
pub use tfidf::{FeatureVector, TfIdfVectorizer, VectorizerConfig, VectorizerState};
pub use types::{
    Candidate, LabeledExample, PredictionMethod, PredictionResult, SectionCode,
};
