use std::fs;
use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};

use statute_classifier::config::EngineConfig;
use statute_classifier::error::{Result, StatuteError};
use statute_classifier::ml::section_classifier::{
    ArtifactKind, LabeledExample, ModelHandle, ModelLifecycle, ModelSource, ModelStore,
    PredictionMethod, SectionCode, SectionEngine, VectorizerConfig,
};
use statute_classifier::normalizer::TextNormalizer;
use statute_classifier::storage::file::{FileStorage, FileStorageConfig};

const THEFT_AND_FRAUD: &[LabeledExample] = &[
    LabeledExample::new("Someone stole my bag", "379"),
    LabeledExample::new("My phone was stolen", "379"),
    LabeledExample::new("He cheated me online", "420"),
    LabeledExample::new("Online shopping fraud", "420"),
];

const DOWRY_AND_MURDER: &[LabeledExample] = &[
    LabeledExample::new("Dowry harassment by husband", "498A"),
    LabeledExample::new("In-laws demanding dowry", "498A"),
    LabeledExample::new("Someone killed my brother", "302"),
    LabeledExample::new("Murder happened", "302"),
];

fn file_store(dir: &TempDir) -> Result<ModelStore> {
    let storage = FileStorage::new(dir.path(), FileStorageConfig::new(dir.path()))?;
    Ok(ModelStore::new(Arc::new(storage)))
}

fn lifecycle(dir: &TempDir, corpus: &'static [LabeledExample]) -> Result<ModelLifecycle> {
    Ok(ModelLifecycle::new(
        TextNormalizer::english(),
        file_store(dir)?,
        Arc::new(ModelHandle::new()),
    )
    .with_corpus(corpus))
}

#[test]
fn restored_engine_predicts_identically() -> Result<()> {
    let dir = TempDir::new()?;
    let config = EngineConfig::default().with_model_dir(dir.path());

    let trained = SectionEngine::from_config(&config)?;
    assert_eq!(trained.start()?, ModelSource::Trained);
    assert!(dir.path().join(ArtifactKind::Vectorizer.file_name()).exists());
    assert!(dir.path().join(ArtifactKind::Classifier.file_name()).exists());

    let restored = SectionEngine::from_config(&config)?;
    assert_eq!(restored.start()?, ModelSource::Restored);

    for text in [
        "Someone stole my phone",
        "Husband torturing me for dowry",
        "He threatened to kill me",
        "xyz abcde",
    ] {
        assert_eq!(trained.predict(text)?, restored.predict(text)?, "{text}");
    }
    Ok(())
}

#[test]
fn mismatched_artifact_pair_is_rejected() -> Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    lifecycle(&first, THEFT_AND_FRAUD)?.start()?;
    lifecycle(&second, DOWRY_AND_MURDER)?.start()?;

    let classifier = ArtifactKind::Classifier.file_name();
    fs::copy(first.path().join(classifier), second.path().join(classifier))?;

    let err = match file_store(&second)?.load() {
        Err(err) => err,
        Ok(_) => panic!("mismatched pair loaded"),
    };
    assert!(matches!(err, StatuteError::InconsistentModel(_)));

    // Startup falls back to training a fresh, consistent model
    let recovered = lifecycle(&second, DOWRY_AND_MURDER)?;
    assert_eq!(recovered.start()?, ModelSource::Trained);
    assert!(file_store(&second)?.load()?.is_some());
    Ok(())
}

#[test]
fn corrupt_artifact_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    lifecycle(&dir, THEFT_AND_FRAUD)?.start()?;

    let path = dir.path().join(ArtifactKind::Vectorizer.file_name());
    let mut bytes = fs::read(&path)?;
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x5a;
    fs::write(&path, &bytes)?;

    let err = match file_store(&dir)?.load() {
        Err(err) => err,
        Ok(_) => panic!("corrupt artifact loaded"),
    };
    assert!(matches!(err, StatuteError::Persistence(_)));

    let lifecycle = lifecycle(&dir, THEFT_AND_FRAUD)?;
    assert!(lifecycle.restore().is_none());
    Ok(())
}

#[test]
fn missing_directory_means_no_model() -> Result<()> {
    let dir = TempDir::new()?;
    let store = file_store(&dir)?;
    assert!(!store.exists());
    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn retrain_overwrites_artifacts_in_place() -> Result<()> {
    let dir = TempDir::new()?;
    let lifecycle = lifecycle(&dir, THEFT_AND_FRAUD)?;
    lifecycle.start()?;

    assert_eq!(lifecycle.retrain()?, THEFT_AND_FRAUD.len());

    let mut names: Vec<String> = fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    assert_eq!(names, vec!["classifier.bin", "vectorizer.bin"]);
    Ok(())
}

#[test]
fn unwritable_model_dir_still_serves() -> Result<()> {
    let blocker = NamedTempFile::new()?;
    let config = EngineConfig::default().with_model_dir(blocker.path().join("models"));

    let engine = SectionEngine::from_config(&config)?;
    assert_eq!(engine.start()?, ModelSource::Trained);

    let result = engine.predict("Someone stole my phone")?;
    assert_eq!(result.section, Some(SectionCode::new("379")));
    assert_eq!(result.method, PredictionMethod::Ml);

    assert_eq!(engine.retrain()?.trained_count, 64);
    assert!(engine.health().model_loaded);
    Ok(())
}

#[test]
fn restart_with_other_normalizer_retrains() -> Result<()> {
    let dir = TempDir::new()?;
    let linguistic = EngineConfig::default().with_model_dir(dir.path());
    SectionEngine::from_config(&linguistic)?.start()?;

    let mut lowercase = linguistic.clone();
    lowercase.linguistic_analysis = false;
    let engine = SectionEngine::from_config(&lowercase)?;
    assert_eq!(engine.start()?, ModelSource::Trained);

    let model = engine.lifecycle().handle().get().expect("model installed");
    assert_eq!(model.vectorizer().normalizer(), "lowercase");

    let result = engine.predict("Someone stole my phone")?;
    assert_eq!(result.section, Some(SectionCode::new("379")));
    assert_eq!(result.method, PredictionMethod::Ml);

    // Switching back retrains again rather than serving the lowercase model
    let engine = SectionEngine::from_config(&linguistic)?;
    assert_eq!(engine.start()?, ModelSource::Trained);
    Ok(())
}

#[test]
fn restart_with_changed_vectorizer_settings_retrains() -> Result<()> {
    let dir = TempDir::new()?;
    let config = EngineConfig::default().with_model_dir(dir.path());
    SectionEngine::from_config(&config)?.start()?;

    let narrower = EngineConfig {
        vectorizer: VectorizerConfig {
            max_features: 5,
            ..VectorizerConfig::default()
        },
        ..config.clone()
    };
    let engine = SectionEngine::from_config(&narrower)?;
    assert_eq!(engine.start()?, ModelSource::Trained);
    let model = engine.lifecycle().handle().get().expect("model installed");
    assert_eq!(model.vectorizer().vocabulary_size(), 5);

    let unchanged = SectionEngine::from_config(&narrower)?;
    assert_eq!(unchanged.start()?, ModelSource::Restored);
    Ok(())
}
