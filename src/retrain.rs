use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::loader::CorpusLoader;
use crate::store::{ModelBundle, ModelStore};
use crate::vectorizer::Vectorizer;

pub const NO_VALID_TEXT: &str = "No valid text found in resumes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrainStatus {
    Success,
}

/// Outcome of a retrain, as handed to the caller.
///
/// Serializes as `{"status":"success","doc_count":N}` or `{"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrainReport {
    Success { status: RetrainStatus, doc_count: usize },
    Failure { error: String },
}

impl RetrainReport {
    pub fn success(doc_count: usize) -> Self {
        RetrainReport::Success {
            status: RetrainStatus::Success,
            doc_count,
        }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        RetrainReport::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetrainReport::Success { .. })
    }

    pub fn doc_count(&self) -> Option<usize> {
        match self {
            RetrainReport::Success { doc_count, .. } => Some(*doc_count),
            RetrainReport::Failure { .. } => None,
        }
    }
}

/// Full rebuild: load corpus, fit, persist.
pub struct RetrainOrchestrator {
    loader: CorpusLoader,
    corpus_dir: PathBuf,
    vectorizer: Vectorizer,
    store: Arc<dyn ModelStore>,
}

impl std::fmt::Debug for RetrainOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrainOrchestrator")
            .field("loader", &self.loader)
            .field("corpus_dir", &self.corpus_dir)
            .finish_non_exhaustive()
    }
}

impl RetrainOrchestrator {
    pub fn new<P: Into<PathBuf>>(loader: CorpusLoader, corpus_dir: P, store: Arc<dyn ModelStore>) -> Self {
        RetrainOrchestrator {
            loader,
            corpus_dir: corpus_dir.into(),
            vectorizer: Vectorizer::default(),
            store,
        }
    }

    /// Rebuild the bundle from scratch and replace the persisted one.
    /// Failures leave the previous bundle in place.
    pub fn retrain(&self) -> RetrainReport {
        let corpus = self.loader.load(&self.corpus_dir);
        if corpus.is_empty() {
            warn!(dir = %self.corpus_dir.display(), "retrain aborted: {NO_VALID_TEXT}");
            return RetrainReport::failure(NO_VALID_TEXT);
        }

        let (model, matrix) = match self.vectorizer.fit(&corpus.texts()) {
            Ok(fitted) => fitted,
            Err(e) => {
                warn!(error = %e, "retrain aborted while fitting");
                return RetrainReport::failure(e.to_string());
            }
        };
        let bundle = ModelBundle::new(model, matrix);
        if let Err(e) = self.store.save(&bundle) {
            warn!(error = %e, "retrain aborted while saving");
            return RetrainReport::failure(e.to_string());
        }

        info!(
            doc_count = bundle.doc_count,
            vocabulary = bundle.model.vocab_size(),
            fallback = corpus.is_fallback(),
            "model retrained"
        );
        RetrainReport::success(corpus.len())
    }

    /// Train once if nothing is persisted yet.
    pub fn ensure_trained(&self) -> Option<RetrainReport> {
        if self.store.exists() {
            return None;
        }
        info!("no persisted model, training initial model");
        Some(self.retrain())
    }
}
