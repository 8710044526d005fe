//! The section engine: the facade over normalization, both classification
//! branches, arbitration and the model lifecycle.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use super::arbiter::DecisionArbiter;
use super::classifier::SectionClassifier;
use super::corpus;
use super::keyword_classifier::KeywordRuleEngine;
use super::lifecycle::{ModelHandle, ModelLifecycle, ModelSource};
use super::persistence::ModelStore;
use super::types::{Candidate, PredictionResult, SectionCode};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::normalizer::{LinguisticCapability, TextNormalizer};
use crate::storage::memory::MemoryStorage;
use crate::storage::{Storage, StorageFactory};

/// Outcome of a retrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrainSummary {
    /// Number of examples the new model was trained on.
    pub trained_count: usize,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"ok"` when the engine answers.
    pub status: String,
    /// Whether a trained model is installed.
    pub model_loaded: bool,
    /// Whether linguistic normalization is available.
    pub normalizer_available: bool,
    /// When the serving model was installed.
    pub model_installed_at: Option<DateTime<Utc>>,
}

/// Hybrid statute section classifier.
///
/// # Examples
///
/// ```
/// use statute_classifier::config::EngineConfig;
/// use statute_classifier::ml::section_classifier::{PredictionMethod, SectionEngine};
/// use statute_classifier::storage::StorageConfig;
/// use statute_classifier::storage::memory::MemoryStorageConfig;
///
/// let config = EngineConfig {
///     storage: StorageConfig::Memory(MemoryStorageConfig::default()),
///     ..EngineConfig::default()
/// };
/// let engine = SectionEngine::from_config(&config).unwrap();
/// engine.start().unwrap();
///
/// let result = engine.predict("Someone stole my phone").unwrap();
/// assert_eq!(result.section.unwrap().as_str(), "379");
/// assert_eq!(result.method, PredictionMethod::Ml);
/// ```
#[derive(Debug)]
pub struct SectionEngine {
    lifecycle: ModelLifecycle,
    keywords: KeywordRuleEngine,
    arbiter: DecisionArbiter,
}

impl SectionEngine {
    /// Create an engine over a lifecycle.
    pub fn new(lifecycle: ModelLifecycle) -> Self {
        SectionEngine {
            lifecycle,
            keywords: KeywordRuleEngine::new(),
            arbiter: DecisionArbiter::new(),
        }
    }

    /// Build an engine from configuration. The model is not loaded until
    /// [`SectionEngine::start`] is called.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let storage = match StorageFactory::create(config.storage.clone()) {
            Ok(storage) => storage,
            Err(e) => {
                // Models trained now still serve; they just do not survive a restart
                warn!("Model storage unavailable, keeping models in memory: {e}");
                Arc::new(MemoryStorage::default()) as Arc<dyn Storage>
            }
        };
        let normalizer =
            TextNormalizer::new(LinguisticCapability::select(config.linguistic_analysis));
        let lifecycle = ModelLifecycle::new(
            normalizer,
            ModelStore::new(storage),
            Arc::new(ModelHandle::new()),
        )
        .with_vectorizer_config(config.vectorizer.clone())
        .with_classifier_config(config.classifier.clone());

        Ok(Self::new(lifecycle))
    }

    /// Install a model, restoring a persisted one when possible.
    pub fn start(&self) -> Result<ModelSource> {
        let source = self.lifecycle.start()?;
        info!("Section engine ready ({source:?} model)");
        Ok(source)
    }

    /// Predict the section for a free-text incident description.
    ///
    /// Without an installed model the keyword rules decide alone. The only
    /// error is an inconsistent model, which fails this request.
    pub fn predict(&self, text: &str) -> Result<PredictionResult> {
        let (ml, keyword) = rayon::join(
            || -> Result<Candidate> {
                match self.lifecycle.handle().require() {
                    Ok(model) => {
                        let normalized = self.lifecycle.normalizer().normalize(text);
                        model.classify(&normalized)
                    }
                    Err(e) => {
                        debug!("{e}, keyword rules only");
                        Ok(Candidate::empty())
                    }
                }
            },
            || self.keywords.classify(text),
        );

        let ml = ml.inspect_err(|e| error!("Prediction failed: {e}"))?;
        let result = self.arbiter.decide(ml, keyword?);
        debug!(
            "Predicted {:?} via {} ({:.4})",
            result.section, result.method, result.confidence
        );
        Ok(result)
    }

    /// Retrain from the corpus and swap the new model in.
    pub fn retrain(&self) -> Result<RetrainSummary> {
        let trained_count = self.lifecycle.retrain()?;
        Ok(RetrainSummary { trained_count })
    }

    /// Sorted, distinct section codes the engine can predict.
    pub fn list_sections(&self) -> Vec<SectionCode> {
        corpus::sections(self.lifecycle.corpus())
    }

    /// Number of training examples per section.
    pub fn section_counts(&self) -> BTreeMap<SectionCode, usize> {
        corpus::section_counts(self.lifecycle.corpus())
    }

    /// Report liveness and degradation state.
    pub fn health(&self) -> HealthStatus {
        let handle = self.lifecycle.handle();
        HealthStatus {
            status: "ok".to_string(),
            model_loaded: handle.is_loaded(),
            normalizer_available: self.lifecycle.normalizer().is_available(),
            model_installed_at: handle.installed_at(),
        }
    }

    /// The model lifecycle.
    pub fn lifecycle(&self) -> &ModelLifecycle {
        &self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::section_classifier::types::PredictionMethod;
    use tempfile::NamedTempFile;

    fn engine() -> SectionEngine {
        let lifecycle = ModelLifecycle::new(
            TextNormalizer::english(),
            ModelStore::new(Arc::new(MemoryStorage::default())),
            Arc::new(ModelHandle::new()),
        );
        SectionEngine::new(lifecycle)
    }

    #[test]
    fn test_keyword_only_without_model() {
        let engine = engine();

        let result = engine.predict("There was a dowry demand").unwrap();
        assert_eq!(result.method, PredictionMethod::Keyword);
        assert_eq!(result.section, Some(SectionCode::new("498A")));

        let result = engine.predict("xyz abcde").unwrap();
        assert_eq!(result.method, PredictionMethod::None);
    }

    #[test]
    fn test_unusable_model_dir_falls_back_to_memory() {
        // A directory cannot be created under a regular file
        let blocker = NamedTempFile::new().unwrap();
        let config = EngineConfig::default().with_model_dir(blocker.path().join("models"));

        let engine = SectionEngine::from_config(&config).unwrap();
        assert_eq!(engine.start().unwrap(), ModelSource::Trained);

        let result = engine.predict("Someone stole my phone").unwrap();
        assert_eq!(result.section, Some(SectionCode::new("379")));
        assert_eq!(result.method, PredictionMethod::Ml);
        assert!(engine.health().model_loaded);
    }

    #[test]
    fn test_health() {
        let engine = engine();
        let health = engine.health();
        assert!(!health.model_loaded);
        assert!(health.normalizer_available);
        assert!(health.model_installed_at.is_none());

        engine.start().unwrap();
        let health = engine.health();
        assert!(health.model_loaded);
        assert!(health.model_installed_at.is_some());
    }

    #[test]
    fn test_sections() {
        let engine = engine();
        let sections = engine.list_sections();
        assert_eq!(sections.len(), 17);
        assert!(sections.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(engine.section_counts().len(), 17);
    }

    #[test]
    fn test_retrain_summary() {
        let engine = engine();
        engine.start().unwrap();
        let summary = engine.retrain().unwrap();
        assert_eq!(summary.trained_count, corpus::TRAINING_DATA.len());
    }
}
