//! TF-IDF vectorizer for text feature extraction.
//!
//! Documents are split into terms of two or more word characters, expanded to
//! word n-grams (unigrams and bigrams by default) and weighted by smoothed
//! inverse document frequency. Every output vector is L2-normalized.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{Result, StatuteError};

/// Normalizer mode of a vectorizer fit on documents of unknown provenance.
pub const UNSPECIFIED_NORMALIZER: &str = "unspecified";

/// Configuration for the TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Maximum vocabulary size.
    pub max_features: usize,
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Inclusive range of n-gram lengths.
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            max_features: 1000,
            min_df: 1,
            ngram_range: (1, 2),
        }
    }
}

impl VectorizerConfig {
    /// Check the configuration for values that cannot produce a vocabulary.
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(StatuteError::invalid_config(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({min_n}, {max_n})"
            )));
        }
        if self.max_features == 0 {
            return Err(StatuteError::invalid_config("max_features must be positive"));
        }
        if self.min_df == 0 {
            return Err(StatuteError::invalid_config("min_df must be positive"));
        }
        Ok(())
    }
}

/// Sparse feature vector over a fitted vocabulary.
///
/// Entries are `(index, weight)` pairs sorted by index with no zero weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Create a vector from `(index, weight)` pairs.
    ///
    /// Pairs are sorted by index; zero weights are dropped.
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= dimension) {
            return Err(StatuteError::invalid_argument(format!(
                "feature index {index} out of range for dimension {dimension}"
            )));
        }
        entries.retain(|(_, weight)| *weight != 0.0);
        entries.sort_by_key(|(index, _)| *index);
        Ok(FeatureVector { dimension, entries })
    }

    /// Create an all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Number of features, including zero ones.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero `(index, weight)` pairs, sorted by index.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero features.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every feature is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of a single feature.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for &(index, weight) in &self.entries {
            dense[index] = weight;
        }
        dense
    }
}

/// Persisted form of a fitted vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerState {
    /// Vocabulary terms in index order (lexicographic).
    pub vocabulary: Vec<String>,
    /// Inverse document frequency per vocabulary index.
    pub idf: Vec<f64>,
    /// Number of documents the vocabulary was fit on.
    pub n_documents: usize,
    /// Configuration used for fitting.
    pub config: VectorizerConfig,
    /// Normalization mode the training documents went through.
    pub normalizer: String,
}

/// TF-IDF vectorizer for text feature extraction.
///
/// # Examples
///
/// ```
/// use statute_classifier::ml::section_classifier::{TfIdfVectorizer, VectorizerConfig};
///
/// let documents = vec!["steal phone".to_string(), "steal bag".to_string()];
/// let vectorizer = TfIdfVectorizer::fit(&documents, &VectorizerConfig::default()).unwrap();
///
/// // steal, phone, bag, "steal phone", "steal bag"
/// assert_eq!(vectorizer.vocabulary_size(), 5);
///
/// let features = vectorizer.transform("steal phone").unwrap();
/// assert_eq!(features.dimension(), 5);
/// assert!((features.norm() - 1.0).abs() < 1e-9);
/// ```
pub struct TfIdfVectorizer {
    /// Vocabulary terms, sorted; a term's index is its position.
    vocabulary: Vec<String>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    config: VectorizerConfig,
    /// Normalization mode of the documents it was fit on.
    normalizer: String,
    /// Analyzer that extracts terms.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Build the analyzer extracting lowercase terms of two or more word
    /// characters.
    pub fn term_analyzer() -> Result<Arc<dyn Analyzer>> {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::terms()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("tfidf_terms");
        Ok(Arc::new(analyzer))
    }

    /// Fit a fresh vectorizer on training documents.
    pub fn fit(documents: &[String], config: &VectorizerConfig) -> Result<Self> {
        if documents.is_empty() {
            return Err(StatuteError::invalid_argument(
                "cannot fit a vectorizer on an empty corpus",
            ));
        }
        config.validate()?;

        let analyzer = Self::term_analyzer()?;
        let n_documents = documents.len();

        let document_terms = documents
            .iter()
            .map(|doc| Self::extract_terms(doc, &analyzer, config.ngram_range))
            .collect::<Result<Vec<_>>>()?;

        // Count document frequencies
        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        for terms in &document_terms {
            let unique_terms: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut candidates: Vec<(&str, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= config.min_df)
            .collect();
        candidates.sort_unstable_by(|a, b| a.0.cmp(b.0));

        if candidates.is_empty() {
            return Err(StatuteError::invalid_argument(
                "corpus produced an empty vocabulary",
            ));
        }

        let idf_of = |df: usize| ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;

        if candidates.len() > config.max_features {
            let weights = Self::aggregate_weights(&candidates, &document_terms, &idf_of);
            let mut ranked: Vec<usize> = (0..candidates.len()).collect();
            // Highest weight first, ties by term order
            ranked.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));
            ranked.truncate(config.max_features);
            ranked.sort_unstable();
            let selected: Vec<(&str, usize)> = ranked.into_iter().map(|i| candidates[i]).collect();
            candidates = selected;
        }

        let vocabulary: Vec<String> = candidates.iter().map(|(t, _)| t.to_string()).collect();
        let idf: Vec<f64> = candidates.iter().map(|(_, df)| idf_of(*df)).collect();

        debug!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            vocabulary.len(),
            n_documents
        );

        Ok(TfIdfVectorizer {
            vocabulary,
            idf,
            n_documents,
            config: config.clone(),
            normalizer: UNSPECIFIED_NORMALIZER.to_string(),
            analyzer,
        })
    }

    /// Sum over documents of each candidate term's L2-normalized TF-IDF weight.
    fn aggregate_weights(
        candidates: &[(&str, usize)],
        document_terms: &[Vec<String>],
        idf_of: &dyn Fn(usize) -> f64,
    ) -> Vec<f64> {
        let index: AHashMap<&str, usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (*term, i))
            .collect();

        let mut weights = vec![0.0; candidates.len()];
        for terms in document_terms {
            let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
            for term in terms {
                if let Some(&i) = index.get(term.as_str()) {
                    *counts.entry(i).or_insert(0.0) += 1.0;
                }
            }
            let raw: Vec<(usize, f64)> = counts
                .into_iter()
                .map(|(i, tf)| (i, tf * idf_of(candidates[i].1)))
                .collect();
            let norm = raw.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (i, w) in raw {
                    weights[i] += w / norm;
                }
            }
        }
        weights
    }

    /// Transform a document into an L2-normalized TF-IDF feature vector.
    ///
    /// Terms outside the vocabulary are ignored; a document with no known
    /// terms yields the zero vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let terms = Self::extract_terms(document, &self.analyzer, self.config.ngram_range)?;

        // Count term frequencies
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in &terms {
            if let Some(index) = self.term_index(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        // Apply IDF and normalize
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut entries {
                *weight /= norm;
            }
        }

        FeatureVector::new(self.vocabulary.len(), entries)
    }

    /// Analyze a document and expand its terms into n-grams.
    fn extract_terms(
        text: &str,
        analyzer: &Arc<dyn Analyzer>,
        (min_n, max_n): (usize, usize),
    ) -> Result<Vec<String>> {
        let tokens: Vec<String> = analyzer.analyze(text)?.map(|token| token.text).collect();

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|window| window.join(" ")));
            }
        }
        Ok(terms)
    }

    /// Index of a term in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|candidate| candidate.as_str().cmp(term))
            .ok()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary terms in index order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Inverse document frequencies in index order.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents the vectorizer was fit on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Record the normalization mode the fitted documents went through.
    ///
    /// Call before fitting a classifier: the mode is part of the fingerprint.
    pub fn with_normalizer<S: Into<String>>(mut self, mode: S) -> Self {
        self.normalizer = mode.into();
        self
    }

    /// Normalization mode of the documents the vectorizer was fit on.
    pub fn normalizer(&self) -> &str {
        &self.normalizer
    }

    /// Configuration the vectorizer was fit with.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// CRC32 over vocabulary terms, IDF weights, dimension and normalizer
    /// mode.
    ///
    /// A classifier records the fingerprint of the vectorizer it was fit
    /// against; pairs whose fingerprints differ were not trained together.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for term in &self.vocabulary {
            hasher.update(term.as_bytes());
            hasher.update(&[0]);
        }
        for idf in &self.idf {
            hasher.update(&idf.to_bits().to_le_bytes());
        }
        hasher.update(&(self.vocabulary.len() as u64).to_le_bytes());
        hasher.update(self.normalizer.as_bytes());
        hasher.finalize()
    }

    /// Capture the persisted form of this vectorizer.
    pub fn to_state(&self) -> VectorizerState {
        VectorizerState {
            vocabulary: self.vocabulary.clone(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
            config: self.config.clone(),
            normalizer: self.normalizer.clone(),
        }
    }

    /// Rebuild a vectorizer from its persisted form.
    pub fn from_state(state: VectorizerState) -> Result<Self> {
        if state.vocabulary.len() != state.idf.len() {
            return Err(StatuteError::persistence(format!(
                "vectorizer has {} terms but {} idf weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }
        if state.vocabulary.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(StatuteError::persistence(
                "vectorizer vocabulary is not sorted and unique",
            ));
        }
        state.config.validate()?;

        Ok(TfIdfVectorizer {
            vocabulary: state.vocabulary,
            idf: state.idf,
            n_documents: state.n_documents,
            config: state.config,
            normalizer: state.normalizer,
            analyzer: Self::term_analyzer()?,
        })
    }
}
