//! Multinomial naive Bayes over TF-IDF feature vectors.

use log::error;
use serde::{Deserialize, Serialize};

use super::tfidf::FeatureVector;
use super::types::SectionCode;
use crate::error::{Result, StatuteError};

/// Configuration for the naive Bayes classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Additive (Lidstone) smoothing parameter.
    pub alpha: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        NaiveBayesConfig { alpha: 0.1 }
    }
}

impl NaiveBayesConfig {
    /// Check the smoothing parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(StatuteError::invalid_config(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Posterior over the training classes for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPosterior {
    /// Most probable class.
    pub section: SectionCode,
    /// Posterior probability of `section`.
    pub confidence: f64,
    /// Probability of every training class, in class order.
    pub distribution: Vec<(SectionCode, f64)>,
}

/// Multinomial naive Bayes classifier.
///
/// Classes are kept sorted, so when two classes share the maximum posterior
/// the lexicographically lower code wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    /// Sorted distinct training labels.
    classes: Vec<SectionCode>,
    /// `ln(count_c / N)` per class.
    class_log_prior: Vec<f64>,
    /// Smoothed log probability of each feature, one row per class.
    feature_log_prob: Vec<Vec<f64>>,
    /// Dimension of the vectors the classifier was fit on.
    n_features: usize,
    alpha: f64,
    /// Fingerprint of the vectorizer that produced the training vectors.
    vectorizer_fingerprint: u32,
}

impl MultinomialNaiveBayes {
    /// Fit the classifier on feature vectors and their labels.
    pub fn fit(
        vectors: &[FeatureVector],
        labels: &[SectionCode],
        config: &NaiveBayesConfig,
        vectorizer_fingerprint: u32,
    ) -> Result<Self> {
        if vectors.is_empty() {
            return Err(StatuteError::invalid_argument(
                "cannot fit a classifier without training vectors",
            ));
        }
        if vectors.len() != labels.len() {
            return Err(StatuteError::invalid_argument(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        config.validate()?;

        let n_features = vectors[0].dimension();
        if let Some(vector) = vectors.iter().find(|v| v.dimension() != n_features) {
            return Err(StatuteError::dimensionality(n_features, vector.dimension()));
        }

        let mut classes: Vec<SectionCode> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];

        for (vector, label) in vectors.iter().zip(labels) {
            // Labels come from `classes`, so the search always succeeds
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_count[c] += 1;
            for &(index, weight) in vector.entries() {
                feature_count[c][index] += weight;
            }
        }

        let n_samples = vectors.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_samples).ln())
            .collect();

        let alpha = config.alpha;
        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .into_iter()
                    .map(|count| ((count + alpha) / total).ln())
                    .collect()
            })
            .collect();

        Ok(MultinomialNaiveBayes {
            classes,
            class_log_prior,
            feature_log_prob,
            n_features,
            alpha,
            vectorizer_fingerprint,
        })
    }

    /// Posterior probability of each class, in class order. Sums to 1.
    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        if vector.dimension() != self.n_features {
            error!(
                "Feature vector has {} dimensions, classifier expects {}",
                vector.dimension(),
                self.n_features
            );
            return Err(StatuteError::dimensionality(
                self.n_features,
                vector.dimension(),
            ));
        }

        let joint_log_likelihood: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior
                    + vector
                        .entries()
                        .iter()
                        .map(|&(index, weight)| weight * log_prob[index])
                        .sum::<f64>()
            })
            .collect();

        // log-sum-exp
        let max = joint_log_likelihood
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max
            + joint_log_likelihood
                .iter()
                .map(|jll| (jll - max).exp())
                .sum::<f64>()
                .ln();

        Ok(joint_log_likelihood
            .into_iter()
            .map(|jll| (jll - log_norm).exp())
            .collect())
    }

    /// Predict the most probable class and the full posterior.
    pub fn predict(&self, vector: &FeatureVector) -> Result<ClassPosterior> {
        let probabilities = self.predict_proba(vector)?;

        let mut best = 0;
        for (c, &p) in probabilities.iter().enumerate() {
            // Strict comparison keeps the first (lowest) class on ties
            if p > probabilities[best] {
                best = c;
            }
        }

        let distribution = self.classes.iter().cloned().zip(probabilities).collect::<Vec<_>>();
        let (section, confidence) = distribution[best].clone();

        Ok(ClassPosterior {
            section,
            confidence,
            distribution,
        })
    }

    /// Sorted training classes.
    pub fn classes(&self) -> &[SectionCode] {
        &self.classes
    }

    /// Dimension of the vectors the classifier accepts.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Smoothing parameter used for fitting.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fingerprint of the vectorizer this classifier was fit against.
    pub fn vectorizer_fingerprint(&self) -> u32 {
        self.vectorizer_fingerprint
    }
}
