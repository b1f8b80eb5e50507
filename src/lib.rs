/// This crate scores a resume against a gold-standard corpus using a TF-IDF vector space.
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod retrain;
pub mod scorer;
pub mod store;
pub mod utils;
pub mod vectorizer;

/// Placement Engine
/// The top-level struct of this crate.
/// It wires the corpus loader, the model store, the similarity scorer and the
/// retrain orchestrator around one shared store handle.
///
/// - `predict(text)` returns a score in `[0, 100]` and never fails
/// - `retrain()` rebuilds and replaces the persisted bundle
pub use engine::PlacementEngine;

/// Engine configuration (corpus directory, bundle path, log filter).
pub use config::EngineConfig;

/// Error taxonomy of the engine.
pub use error::EngineError;

/// Corpus Loader
/// Reads the reference documents from a directory and drops degenerate ones.
/// Falls back to a small built-in corpus when the directory has no documents.
pub use loader::{CorpusLoader, PdfExtractor, PlainTextExtractor, ReferenceCorpus, SourceDocument, TextExtractor};

/// TF-IDF Vectorizer
/// Fits a `TermWeightingModel` (vocabulary + IDF) and a `DocumentTermMatrix`
/// (one L2-normalized sparse row per document) over a corpus.
pub use vectorizer::{DocumentTermMatrix, TermWeightingModel, Vectorizer};

/// TF IDF Calculation Engine Trait
/// Plug point for the weighting scheme; `DefaultTFIDFEngine` is smoothed TF-IDF.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Token Frequency structure
/// Occurrence counts of each token within one document.
pub use vectorizer::token::TokenFrequency;

/// Model Store
/// `ModelBundle` is the single unit of persistence; `FileModelStore` writes it atomically.
pub use store::{FileModelStore, ModelBundle, ModelStore};

/// Similarity Scorer
pub use scorer::{BestMatch, ScoreNormalization, SimilarityScorer};

/// Retrain Orchestrator
pub use retrain::{RetrainOrchestrator, RetrainReport};
