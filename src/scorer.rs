use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::store::{ModelBundle, ModelStore};
use crate::utils::math::vector::ZeroSpVec;

/// Maps a raw cosine similarity onto the reported 0-100 scale:
/// `clamp(raw * scale, floor, ceiling)`.
///
/// The default constants are an uncalibrated heuristic; keep them unless
/// new calibration data says otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNormalization {
    pub scale: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for ScoreNormalization {
    fn default() -> Self {
        ScoreNormalization {
            scale: 200.0,
            floor: 10.0,
            ceiling: 98.0,
        }
    }
}

impl ScoreNormalization {
    #[inline]
    pub fn apply(&self, raw_similarity: f64) -> f64 {
        (raw_similarity * self.scale).min(self.ceiling).max(self.floor)
    }
}

/// Best-matching reference row for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub row: usize,
    pub similarity: f64,
}

/// Max cosine similarity of `query` over every row of the bundle's matrix.
/// `None` when the matrix has no rows. The earliest row wins ties, and a NaN
/// similarity is kept so the caller can reject it.
pub fn best_match(bundle: &ModelBundle, query: &ZeroSpVec<f32>) -> Option<BestMatch> {
    bundle
        .matrix
        .rows()
        .iter()
        .enumerate()
        .map(|(row, doc)| BestMatch {
            row,
            similarity: query.cosine_similarity(doc),
        })
        .fold(None, |best: Option<BestMatch>, candidate| match best {
            Some(b) if b.similarity.is_nan() || b.similarity >= candidate.similarity => Some(b),
            _ => Some(candidate),
        })
}

/// Scores incoming documents against the persisted bundle.
///
/// The bundle is loaded through the injected store on every call, so a
/// retrain is picked up without any refresh step.
#[derive(Clone)]
pub struct SimilarityScorer {
    store: Arc<dyn ModelStore>,
    normalization: ScoreNormalization,
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("normalization", &self.normalization)
            .finish_non_exhaustive()
    }
}

impl SimilarityScorer {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        SimilarityScorer {
            store,
            normalization: ScoreNormalization::default(),
        }
    }

    pub fn with_normalization(mut self, normalization: ScoreNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Score in `[0, 100]`. Never fails: a missing bundle or any error
    /// scores `0.0`.
    pub fn predict(&self, text: &str) -> f64 {
        match self.try_predict(text) {
            Ok(score) => score,
            Err(e) if e.is_not_found() => {
                debug!(error = %e, "no trained model, scoring 0");
                0.0
            }
            Err(e) => {
                warn!(error = %e, "prediction failed, scoring 0");
                0.0
            }
        }
    }

    /// Like [`predict`](Self::predict) but surfaces why a score could not be
    /// computed.
    pub fn try_predict(&self, text: &str) -> Result<f64> {
        let bundle = self.store.load()?;
        self.score_bundle(&bundle, text)
    }

    /// Score against an already loaded bundle.
    /// An empty matrix scores `0.0`; a non-finite similarity is an error.
    pub fn score_bundle(&self, bundle: &ModelBundle, text: &str) -> Result<f64> {
        let query = bundle.model.transform(text);
        match best_match(bundle, &query) {
            Some(best) if !best.similarity.is_finite() => Err(EngineError::InvalidBundle(format!(
                "similarity against row {} is not finite",
                best.row
            ))),
            Some(best) => Ok(self.normalization.apply(best.similarity)),
            None => Ok(0.0),
        }
    }

    /// Raw best match for diagnostics.
    pub fn explain(&self, text: &str) -> Result<Option<BestMatch>> {
        let bundle = self.store.load()?;
        let query = bundle.model.transform(text);
        Ok(best_match(&bundle, &query))
    }
}
