use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};

/// Extracted text must be longer than this (after trimming) to be kept.
pub const MIN_TEXT_CHARS: usize = 50;

/// Built-in corpus used when no source documents are configured.
pub const FALLBACK_DOCUMENTS: [&str; 3] = [
    "Software Engineer Java Python SQL Docker Kubernetes",
    "Full Stack Developer React Node.js TypeScript MongoDB",
    "DevOps Engineer CI/CD Jenkins AWS Terraform Linux",
];

/// One document of the reference corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path of the source file, or `builtin:<n>` for fallback documents.
    pub source: String,
    pub text: String,
}

/// Ordered set of reference documents for one training run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCorpus {
    documents: Vec<SourceDocument>,
    fallback: bool,
}

impl ReferenceCorpus {
    pub fn new(documents: Vec<SourceDocument>) -> Self {
        ReferenceCorpus { documents, fallback: false }
    }

    /// The built-in synthetic corpus.
    pub fn fallback() -> Self {
        let documents = FALLBACK_DOCUMENTS
            .iter()
            .enumerate()
            .map(|(i, text)| SourceDocument {
                source: format!("builtin:{i}"),
                text: text.to_string(),
            })
            .collect();
        ReferenceCorpus { documents, fallback: true }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether this is the built-in corpus.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|doc| doc.text.as_str()).collect()
    }
}

/// Pulls plain text out of one source file.
pub trait TextExtractor: Send + Sync {
    /// File extension handled, without the dot. Matched case-insensitively.
    fn extension(&self) -> &str;

    fn extract(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extension(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path) -> Result<String> {
        // pdf-extract panics on some malformed files
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(EngineError::Extraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(_) => Err(EngineError::Extraction {
                path: path.to_path_buf(),
                reason: "pdf parser panicked".to_string(),
            }),
        }
    }
}

/// For corpora that were already converted to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extension(&self) -> &str {
        "txt"
    }

    fn extract(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| EngineError::Extraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Reads the reference corpus from a directory.
pub struct CorpusLoader {
    extractor: Box<dyn TextExtractor>,
}

impl Default for CorpusLoader {
    fn default() -> Self {
        CorpusLoader::new(PdfExtractor)
    }
}

impl std::fmt::Debug for CorpusLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusLoader")
            .field("extension", &self.extractor.extension())
            .finish()
    }
}

impl CorpusLoader {
    pub fn new<X>(extractor: X) -> Self
    where
        X: TextExtractor + 'static,
    {
        CorpusLoader { extractor: Box::new(extractor) }
    }

    /// Load every matching document in `dir`.
    ///
    /// A missing or empty directory yields the built-in fallback corpus.
    /// If source files exist but none survive extraction and the length
    /// filter, the result is empty and the caller decides what to do.
    pub fn load(&self, dir: &Path) -> ReferenceCorpus {
        let sources = self.list_sources(dir);
        if sources.is_empty() {
            info!(dir = %dir.display(), "no source documents found, using built-in corpus");
            return ReferenceCorpus::fallback();
        }

        info!(dir = %dir.display(), files = sources.len(), "extracting reference documents");
        let documents: Vec<SourceDocument> = sources
            .iter()
            .filter_map(|path| self.load_one(path))
            .collect();
        info!(kept = documents.len(), found = sources.len(), "reference corpus ready");
        ReferenceCorpus::new(documents)
    }

    fn load_one(&self, path: &Path) -> Option<SourceDocument> {
        let text = match self.extractor.extract(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "skipping unreadable document");
                return None;
            }
        };
        let chars = text.trim().chars().count();
        if chars <= MIN_TEXT_CHARS {
            debug!(path = %path.display(), chars, "skipping document with too little text");
            return None;
        }
        Some(SourceDocument {
            source: path.display().to_string(),
            text,
        })
    }

    /// Matching files directly under `dir`, sorted by path.
    fn list_sources(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "corpus directory not readable");
                return Vec::new();
            }
        };
        let wanted = self.extractor.extension();
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
            })
            .collect();
        paths.sort();
        paths
    }
}
