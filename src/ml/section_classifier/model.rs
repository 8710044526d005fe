//! The trained vectorizer/classifier pair.

use log::debug;

use super::classifier::SectionClassifier;
use super::naive_bayes::{ClassPosterior, MultinomialNaiveBayes};
use super::tfidf::TfIdfVectorizer;
use super::types::Candidate;
use crate::error::{Result, StatuteError};

/// A vectorizer and the classifier fit on its output.
///
/// Construction checks that the classifier was fit against this exact
/// vectorizer, so every `TrainedModel` is internally consistent.
#[derive(Debug)]
pub struct TrainedModel {
    vectorizer: TfIdfVectorizer,
    classifier: MultinomialNaiveBayes,
}

impl TrainedModel {
    /// Pair a vectorizer with a classifier, rejecting mismatched pairs.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: MultinomialNaiveBayes) -> Result<Self> {
        if classifier.n_features() != vectorizer.vocabulary_size() {
            return Err(StatuteError::inconsistent_model(format!(
                "classifier expects {} features, vectorizer produces {}",
                classifier.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        if classifier.vectorizer_fingerprint() != vectorizer.fingerprint() {
            return Err(StatuteError::inconsistent_model(format!(
                "classifier was fit against vectorizer {:08x}, found {:08x}",
                classifier.vectorizer_fingerprint(),
                vectorizer.fingerprint()
            )));
        }

        Ok(TrainedModel {
            vectorizer,
            classifier,
        })
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The fitted classifier.
    pub fn classifier(&self) -> &MultinomialNaiveBayes {
        &self.classifier
    }

    /// Full posterior for normalized text.
    pub fn posterior(&self, normalized: &str) -> Result<ClassPosterior> {
        let features = self.vectorizer.transform(normalized)?;
        debug!(
            "Vectorized {:?} into {} of {} features",
            normalized,
            features.nnz(),
            features.dimension()
        );
        self.classifier.predict(&features)
    }
}

impl SectionClassifier for TrainedModel {
    /// Classify already-normalized text.
    fn classify(&self, text: &str) -> Result<Candidate> {
        let posterior = self.posterior(text)?;
        Ok(Candidate::new(posterior.section, posterior.confidence))
    }

    fn name(&self) -> &str {
        "ml"
    }
}
