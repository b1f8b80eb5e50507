use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::loader::CorpusLoader;
use crate::retrain::{RetrainOrchestrator, RetrainReport};
use crate::scorer::SimilarityScorer;
use crate::store::{FileModelStore, ModelBundle, ModelStore};

/// Scoring consumer boundary: `predict` and `retrain` over one shared store.
pub struct PlacementEngine {
    scorer: SimilarityScorer,
    orchestrator: RetrainOrchestrator,
    store: Arc<dyn ModelStore>,
}

impl std::fmt::Debug for PlacementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementEngine")
            .field("scorer", &self.scorer)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}

impl PlacementEngine {
    /// PDF corpus and file store at the configured locations.
    pub fn from_config(config: &EngineConfig) -> Self {
        let store: Arc<dyn ModelStore> = Arc::new(FileModelStore::new(&config.model_path));
        Self::with_parts(CorpusLoader::default(), config, store)
    }

    pub fn with_parts(loader: CorpusLoader, config: &EngineConfig, store: Arc<dyn ModelStore>) -> Self {
        PlacementEngine {
            scorer: SimilarityScorer::new(store.clone()),
            orchestrator: RetrainOrchestrator::new(loader, &config.corpus_dir, store.clone()),
            store,
        }
    }

    pub fn predict(&self, resume_text: &str) -> f64 {
        self.scorer.predict(resume_text)
    }

    pub fn retrain(&self) -> RetrainReport {
        self.orchestrator.retrain()
    }

    /// Startup hook: train once when no bundle is persisted.
    pub fn ensure_trained(&self) -> Option<RetrainReport> {
        self.orchestrator.ensure_trained()
    }

    pub fn load_bundle(&self) -> Result<ModelBundle> {
        self.store.load()
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }
}
