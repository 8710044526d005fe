//! Training, persistence and hot replacement of the serving model.
//!
//! The serving model lives in a [`ModelHandle`]. Readers take a cheap `Arc`
//! snapshot and keep using it even if a retrain swaps in a new model halfway
//! through their request. [`ModelLifecycle`] is the only writer: it builds a
//! complete model off to the side and installs it with a single write.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use super::corpus::TRAINING_DATA;
use super::model::TrainedModel;
use super::naive_bayes::{MultinomialNaiveBayes, NaiveBayesConfig};
use super::persistence::ModelStore;
use super::tfidf::{TfIdfVectorizer, VectorizerConfig};
use super::types::{LabeledExample, SectionCode};
use crate::error::{Result, StatuteError};
use crate::normalizer::TextNormalizer;

#[derive(Debug)]
struct Installed {
    model: Arc<TrainedModel>,
    installed_at: DateTime<Utc>,
}

/// Shared, atomically replaceable slot holding the serving model.
#[derive(Debug, Default)]
pub struct ModelHandle {
    slot: RwLock<Option<Installed>>,
}

impl ModelHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current model.
    pub fn get(&self) -> Option<Arc<TrainedModel>> {
        self.slot
            .read()
            .as_ref()
            .map(|installed| Arc::clone(&installed.model))
    }

    /// Snapshot of the current model, failing with `ModelUnavailable` when
    /// none is installed.
    pub fn require(&self) -> Result<Arc<TrainedModel>> {
        self.get()
            .ok_or_else(|| StatuteError::model_unavailable("no trained model installed"))
    }

    /// Whether a model is installed.
    pub fn is_loaded(&self) -> bool {
        self.slot.read().is_some()
    }

    /// When the current model was installed.
    pub fn installed_at(&self) -> Option<DateTime<Utc>> {
        self.slot.read().as_ref().map(|installed| installed.installed_at)
    }

    /// Replace the current model, returning the previous one.
    pub fn install(&self, model: TrainedModel) -> Option<Arc<TrainedModel>> {
        let installed = Installed {
            model: Arc::new(model),
            installed_at: Utc::now(),
        };
        self.slot
            .write()
            .replace(installed)
            .map(|previous| previous.model)
    }

    /// Remove the current model.
    pub fn clear(&self) -> Option<Arc<TrainedModel>> {
        self.slot.write().take().map(|previous| previous.model)
    }
}

/// Where the model installed at startup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Loaded from persisted artifacts.
    Restored,
    /// Trained from the corpus.
    Trained,
}

/// Owns training, persistence and installation of models.
#[derive(Debug)]
pub struct ModelLifecycle {
    normalizer: TextNormalizer,
    store: ModelStore,
    handle: Arc<ModelHandle>,
    corpus: &'static [LabeledExample],
    vectorizer_config: VectorizerConfig,
    classifier_config: NaiveBayesConfig,
    /// Serializes retrains.
    retrain_lock: Mutex<()>,
}

impl ModelLifecycle {
    /// Create a lifecycle over the built-in corpus.
    pub fn new(normalizer: TextNormalizer, store: ModelStore, handle: Arc<ModelHandle>) -> Self {
        ModelLifecycle {
            normalizer,
            store,
            handle,
            corpus: TRAINING_DATA,
            vectorizer_config: VectorizerConfig::default(),
            classifier_config: NaiveBayesConfig::default(),
            retrain_lock: Mutex::new(()),
        }
    }

    /// Use a different training corpus.
    pub fn with_corpus(mut self, corpus: &'static [LabeledExample]) -> Self {
        self.corpus = corpus;
        self
    }

    /// Use different vectorizer settings.
    pub fn with_vectorizer_config(mut self, config: VectorizerConfig) -> Self {
        self.vectorizer_config = config;
        self
    }

    /// Use different classifier settings.
    pub fn with_classifier_config(mut self, config: NaiveBayesConfig) -> Self {
        self.classifier_config = config;
        self
    }

    /// The handle this lifecycle installs models into.
    pub fn handle(&self) -> &Arc<ModelHandle> {
        &self.handle
    }

    /// The normalizer used for training.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// The artifact store.
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// The training corpus.
    pub fn corpus(&self) -> &'static [LabeledExample] {
        self.corpus
    }

    /// Train a fresh model on a corpus. Deterministic for a given corpus.
    pub fn train(&self, corpus: &[LabeledExample]) -> Result<TrainedModel> {
        if corpus.is_empty() {
            return Err(StatuteError::invalid_argument("training corpus is empty"));
        }
        let start = Instant::now();

        let documents: Vec<String> = corpus
            .par_iter()
            .map(|example| self.normalizer.normalize(example.text))
            .collect();
        let labels: Vec<SectionCode> = corpus.iter().map(LabeledExample::section_code).collect();

        let vectorizer = TfIdfVectorizer::fit(&documents, &self.vectorizer_config)?
            .with_normalizer(self.normalizer.mode());
        let vectors = documents
            .iter()
            .map(|document| vectorizer.transform(document))
            .collect::<Result<Vec<_>>>()?;
        let classifier = MultinomialNaiveBayes::fit(
            &vectors,
            &labels,
            &self.classifier_config,
            vectorizer.fingerprint(),
        )?;

        let model = TrainedModel::new(vectorizer, classifier)?;
        info!(
            "Trained model on {} examples: {} features, {} sections in {:?}",
            corpus.len(),
            model.vectorizer().vocabulary_size(),
            model.classifier().classes().len(),
            start.elapsed()
        );
        Ok(model)
    }

    /// Persist a model. Failures are logged and returned, never fatal to
    /// the serving model.
    pub fn persist(&self, model: &TrainedModel) -> Result<()> {
        self.store.save(model).inspect_err(|e| {
            warn!("Could not save model: {e}");
        })
    }

    /// Why a model cannot serve under the current settings, if it cannot.
    fn incompatibility(&self, model: &TrainedModel) -> Option<String> {
        let vectorizer = model.vectorizer();
        if vectorizer.normalizer() != self.normalizer.mode() {
            return Some(format!(
                "trained on {} normalization, running with {}",
                vectorizer.normalizer(),
                self.normalizer.mode()
            ));
        }
        if vectorizer.config() != &self.vectorizer_config {
            return Some(format!(
                "vectorizer settings changed ({:?} -> {:?})",
                vectorizer.config(),
                self.vectorizer_config
            ));
        }
        if model.classifier().alpha() != self.classifier_config.alpha {
            return Some(format!(
                "smoothing changed ({} -> {})",
                model.classifier().alpha(),
                self.classifier_config.alpha
            ));
        }
        None
    }

    /// Load the persisted model, if a usable one exists.
    ///
    /// A model trained with a different normalizer mode or different
    /// vectorizer or classifier settings is not usable.
    pub fn restore(&self) -> Option<TrainedModel> {
        match self.store.load() {
            Ok(Some(model)) => {
                if let Some(reason) = self.incompatibility(&model) {
                    warn!("Ignoring persisted model: {reason}");
                    return None;
                }
                info!(
                    "Loaded pre-trained model ({} features, {} sections)",
                    model.vectorizer().vocabulary_size(),
                    model.classifier().classes().len()
                );
                Some(model)
            }
            Ok(None) => {
                info!("No persisted model found");
                None
            }
            Err(e) => {
                warn!("Could not load model: {e}");
                None
            }
        }
    }

    /// Install a model at startup: restore it, or train and persist one.
    pub fn start(&self) -> Result<ModelSource> {
        if let Some(model) = self.restore() {
            self.handle.install(model);
            return Ok(ModelSource::Restored);
        }

        let model = self.train(self.corpus)?;
        let _ = self.persist(&model);
        self.handle.install(model);
        Ok(ModelSource::Trained)
    }

    /// Retrain from the corpus and swap the result in.
    ///
    /// Concurrent calls run one at a time. Predictions keep using the old
    /// model until the swap, and a failed training run leaves it in place.
    /// Returns the number of training examples.
    pub fn retrain(&self) -> Result<usize> {
        let _guard = self.retrain_lock.lock();

        let model = self.train(self.corpus)?;
        let _ = self.persist(&model);
        self.handle.install(model);

        info!("Model retrained with {} examples", self.corpus.len());
        Ok(self.corpus.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::section_classifier::classifier::SectionClassifier;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{Storage, StorageInput, StorageOutput};

    /// Storage that reads like memory storage but refuses every write.
    #[derive(Debug, Default)]
    struct ReadOnlyStorage {
        inner: MemoryStorage,
    }

    impl Storage for ReadOnlyStorage {
        fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
            self.inner.open_input(name)
        }

        fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
            Err(StatuteError::storage(format!("read-only storage: {name}")))
        }

        fn file_exists(&self, name: &str) -> bool {
            self.inner.file_exists(name)
        }

        fn delete_file(&self, name: &str) -> Result<()> {
            self.inner.delete_file(name)
        }

        fn list_files(&self) -> Result<Vec<String>> {
            self.inner.list_files()
        }

        fn file_size(&self, name: &str) -> Result<u64> {
            self.inner.file_size(name)
        }

        fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
            self.inner.rename_file(old_name, new_name)
        }

        fn sync(&self) -> Result<()> {
            self.inner.sync()
        }
    }

    const SMALL_CORPUS: &[LabeledExample] = &[
        LabeledExample::new("Someone stole my bag", "379"),
        LabeledExample::new("My phone was stolen", "379"),
        LabeledExample::new("He cheated me online", "420"),
        LabeledExample::new("Online shopping fraud", "420"),
    ];

    fn lifecycle(storage: &MemoryStorage) -> ModelLifecycle {
        ModelLifecycle::new(
            TextNormalizer::english(),
            ModelStore::new(Arc::new(storage.clone())),
            Arc::new(ModelHandle::new()),
        )
        .with_corpus(SMALL_CORPUS)
    }

    #[test]
    fn test_handle_swap_keeps_old_snapshot() {
        let storage = MemoryStorage::default();
        let lifecycle = lifecycle(&storage);
        let handle = lifecycle.handle();
        assert!(!handle.is_loaded());
        assert!(handle.installed_at().is_none());

        handle.install(lifecycle.train(SMALL_CORPUS).unwrap());
        let snapshot = handle.get().unwrap();

        let previous = handle.install(lifecycle.train(SMALL_CORPUS).unwrap());
        assert!(Arc::ptr_eq(&previous.unwrap(), &snapshot));
        assert!(!Arc::ptr_eq(&handle.get().unwrap(), &snapshot));
        assert!(snapshot.classify("steal phone").is_ok());

        handle.clear();
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_training_is_deterministic() {
        let storage = MemoryStorage::default();
        let lifecycle = lifecycle(&storage);

        let a = lifecycle.train(SMALL_CORPUS).unwrap();
        let b = lifecycle.train(SMALL_CORPUS).unwrap();
        assert_eq!(a.vectorizer().vocabulary(), b.vectorizer().vocabulary());
        assert_eq!(a.classifier(), b.classifier());
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let storage = MemoryStorage::default();
        assert!(lifecycle(&storage).train(&[]).is_err());
    }

    #[test]
    fn test_start_trains_then_restores() {
        let storage = MemoryStorage::default();

        let first = lifecycle(&storage);
        assert_eq!(first.start().unwrap(), ModelSource::Trained);
        assert!(first.handle().is_loaded());
        assert!(first.store().exists());

        let second = lifecycle(&storage);
        assert_eq!(second.start().unwrap(), ModelSource::Restored);
        assert_eq!(
            second.handle().get().unwrap().classifier(),
            first.handle().get().unwrap().classifier()
        );
    }

    #[test]
    fn test_corrupt_artifacts_trigger_training() {
        let storage = MemoryStorage::default();
        lifecycle(&storage).start().unwrap();
        storage.put_bytes("vectorizer.bin", b"not a model");

        let lifecycle = lifecycle(&storage);
        assert!(lifecycle.restore().is_none());
        assert_eq!(lifecycle.start().unwrap(), ModelSource::Trained);
    }

    #[test]
    fn test_retrain_replaces_model() {
        let storage = MemoryStorage::default();
        let lifecycle = lifecycle(&storage);
        lifecycle.start().unwrap();
        let before = lifecycle.handle().get().unwrap();

        assert_eq!(lifecycle.retrain().unwrap(), SMALL_CORPUS.len());
        let after = lifecycle.handle().get().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.classifier(), after.classifier());
    }

    #[test]
    fn test_write_failures_do_not_block_serving() {
        let lifecycle = ModelLifecycle::new(
            TextNormalizer::english(),
            ModelStore::new(Arc::new(ReadOnlyStorage::default())),
            Arc::new(ModelHandle::new()),
        )
        .with_corpus(SMALL_CORPUS);

        assert_eq!(lifecycle.start().unwrap(), ModelSource::Trained);
        assert!(lifecycle.handle().is_loaded());
        assert!(!lifecycle.store().exists());

        let before = lifecycle.handle().get().unwrap();
        assert_eq!(lifecycle.retrain().unwrap(), SMALL_CORPUS.len());
        assert!(!Arc::ptr_eq(&before, &lifecycle.handle().get().unwrap()));
    }

    #[test]
    fn test_require_reports_missing_model() {
        let handle = ModelHandle::new();
        assert!(matches!(
            handle.require().unwrap_err(),
            StatuteError::ModelUnavailable(_)
        ));
    }

    #[test]
    fn test_model_records_normalizer_mode() {
        let storage = MemoryStorage::default();
        let model = lifecycle(&storage).train(SMALL_CORPUS).unwrap();
        assert_eq!(model.vectorizer().normalizer(), "english");
    }

    #[test]
    fn test_restore_rejects_other_normalizer_mode() {
        let storage = MemoryStorage::default();
        lifecycle(&storage).start().unwrap();

        let lowercase = ModelLifecycle::new(
            TextNormalizer::lowercase_only(),
            ModelStore::new(Arc::new(storage.clone())),
            Arc::new(ModelHandle::new()),
        )
        .with_corpus(SMALL_CORPUS);
        assert!(lowercase.restore().is_none());
        assert_eq!(lowercase.start().unwrap(), ModelSource::Trained);
        assert_eq!(
            lowercase.handle().get().unwrap().vectorizer().normalizer(),
            "lowercase"
        );

        // The lowercase model has replaced the stored one
        assert!(lifecycle(&storage).restore().is_none());
    }

    #[test]
    fn test_restore_rejects_changed_settings() {
        let storage = MemoryStorage::default();
        lifecycle(&storage).start().unwrap();

        let narrower = lifecycle(&storage).with_vectorizer_config(VectorizerConfig {
            max_features: 5,
            ..VectorizerConfig::default()
        });
        assert!(narrower.restore().is_none());
        assert_eq!(narrower.start().unwrap(), ModelSource::Trained);
        assert_eq!(narrower.handle().get().unwrap().vectorizer().vocabulary_size(), 5);

        let smoother = lifecycle(&storage).with_classifier_config(NaiveBayesConfig { alpha: 1.0 });
        assert!(smoother.restore().is_none());
    }
}
