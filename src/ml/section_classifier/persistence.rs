//! Durable storage of trained models.
//!
//! A model is stored as two artifacts, `vectorizer.bin` and `classifier.bin`.
//! Each artifact is a small header followed by a bincode payload:
//!
//! ```text
//! magic    [u8; 4]   b"SCVZ" (vectorizer) or b"SCNB" (classifier)
//! version  u16 LE
//! length   u64 LE    payload length in bytes
//! crc32    u32 LE    checksum of the payload
//! payload  [u8]      bincode
//! ```
//!
//! Artifacts are written under a temporary name and renamed into place, so a
//! crash mid-write leaves the previous artifact intact.

use std::io::{Read, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::model::TrainedModel;
use super::naive_bayes::MultinomialNaiveBayes;
use super::tfidf::{TfIdfVectorizer, VectorizerState};
use crate::error::{Result, StatuteError};
use crate::storage::{Storage, StorageInput, StorageOutput};

/// Current artifact format version.
pub const FORMAT_VERSION: u16 = 2;

/// Suffix of artifacts that are still being written.
const TEMP_SUFFIX: &str = ".tmp";

/// The two artifacts making up a persisted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The fitted TF-IDF vectorizer.
    Vectorizer,
    /// The fitted naive Bayes classifier.
    Classifier,
}

impl ArtifactKind {
    /// File name of the artifact.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Vectorizer => "vectorizer.bin",
            ArtifactKind::Classifier => "classifier.bin",
        }
    }

    fn magic(self) -> &'static [u8; 4] {
        match self {
            ArtifactKind::Vectorizer => b"SCVZ",
            ArtifactKind::Classifier => b"SCNB",
        }
    }
}

/// Reads and writes model artifacts through a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct ModelStore {
    storage: Arc<dyn Storage>,
}

impl ModelStore {
    /// Create a store over a storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        ModelStore { storage }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Whether both artifacts are present.
    pub fn exists(&self) -> bool {
        self.storage.file_exists(ArtifactKind::Vectorizer.file_name())
            && self.storage.file_exists(ArtifactKind::Classifier.file_name())
    }

    /// Persist both halves of a model.
    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        self.write_artifact(ArtifactKind::Vectorizer, &model.vectorizer().to_state())?;
        self.write_artifact(ArtifactKind::Classifier, model.classifier())?;
        self.storage.sync()?;

        info!(
            "Saved model ({} features, {} sections)",
            model.vectorizer().vocabulary_size(),
            model.classifier().classes().len()
        );
        Ok(())
    }

    /// Load a persisted model.
    ///
    /// Returns `Ok(None)` when either artifact is missing. Corrupt,
    /// undecodable and mismatched artifacts are errors.
    pub fn load(&self) -> Result<Option<TrainedModel>> {
        for kind in [ArtifactKind::Vectorizer, ArtifactKind::Classifier] {
            if !self.storage.file_exists(kind.file_name()) {
                debug!("Model artifact {} not found", kind.file_name());
                return Ok(None);
            }
        }

        let state: VectorizerState = self.read_artifact(ArtifactKind::Vectorizer)?;
        let classifier: MultinomialNaiveBayes = self.read_artifact(ArtifactKind::Classifier)?;
        let vectorizer = TfIdfVectorizer::from_state(state)?;

        TrainedModel::new(vectorizer, classifier).map(Some)
    }

    /// Remove both artifacts if present.
    pub fn clear(&self) -> Result<()> {
        for kind in [ArtifactKind::Vectorizer, ArtifactKind::Classifier] {
            if self.storage.file_exists(kind.file_name()) {
                self.storage.delete_file(kind.file_name())?;
            }
        }
        Ok(())
    }

    /// Encode a value as a framed artifact and move it into place.
    pub fn write_artifact<T: Serialize>(&self, kind: ArtifactKind, value: &T) -> Result<()> {
        let payload = bincode::serialize(value)?;
        let temp_name = format!("{}{TEMP_SUFFIX}", kind.file_name());

        let mut output = self.storage.create_output(&temp_name)?;
        let written = Self::write_frame(&mut output, kind, &payload)
            .and_then(|_| output.close());
        if let Err(e) = written {
            // Best effort; the temp file is overwritten on the next attempt anyway
            let _ = self.storage.delete_file(&temp_name);
            return Err(e);
        }
        drop(output);

        self.storage.rename_file(&temp_name, kind.file_name())?;
        debug!("Wrote {} ({} payload bytes)", kind.file_name(), payload.len());
        Ok(())
    }

    fn write_frame<W: Write>(writer: &mut W, kind: ArtifactKind, payload: &[u8]) -> Result<()> {
        writer.write_all(kind.magic())?;
        writer.write_u16::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u64::<LittleEndian>(payload.len() as u64)?;
        writer.write_u32::<LittleEndian>(crc32fast::hash(payload))?;
        writer.write_all(payload)?;
        Ok(())
    }

    /// Read, verify and decode a framed artifact.
    pub fn read_artifact<T: DeserializeOwned>(&self, kind: ArtifactKind) -> Result<T> {
        let name = kind.file_name();
        let mut input = self.storage.open_input(name)?;
        let size = input.size()?;

        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        if &magic != kind.magic() {
            return Err(StatuteError::persistence(format!(
                "{name}: not a {kind:?} artifact"
            )));
        }

        let version = input.read_u16::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(StatuteError::persistence(format!(
                "{name}: unsupported format version {version}"
            )));
        }

        let length = input.read_u64::<LittleEndian>()?;
        let checksum = input.read_u32::<LittleEndian>()?;
        let header_len = 4 + 2 + 8 + 4;
        if length != size.saturating_sub(header_len) {
            return Err(StatuteError::persistence(format!(
                "{name}: header declares {length} payload bytes, file holds {}",
                size.saturating_sub(header_len)
            )));
        }

        let mut payload = vec![0u8; length as usize];
        input.read_exact(&mut payload)?;
        input.close()?;

        let actual = crc32fast::hash(&payload);
        if actual != checksum {
            return Err(StatuteError::persistence(format!(
                "{name}: checksum mismatch (expected {checksum:08x}, got {actual:08x})"
            )));
        }

        Ok(bincode::deserialize(&payload)?)
    }
}
