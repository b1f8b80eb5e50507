use indexmap::IndexMap;

use crate::vectorizer::token::TokenFrequency;

/// keep document count and term statistics for one fit
///
/// It does not store document text; it only manages:
/// - The number of documents
/// - The number of documents in which each term appears (document frequency)
/// - The total occurrences of each term across the corpus
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// document count
    doc_num: u64,
    /// term -> (document frequency, total frequency)
    term_counts: IndexMap<String, TermStat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermStat {
    pub doc_freq: u64,
    pub total_freq: u64,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document's token frequency to the corpus
    pub fn add_doc(&mut self, freq: &TokenFrequency) {
        self.doc_num += 1;
        for (token, count) in freq.iter() {
            let stat = self.term_counts.entry(token.to_string()).or_default();
            stat.doc_freq += 1;
            stat.total_freq += count as u64;
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_doc_freq(&self, term: &str) -> u64 {
        self.term_counts.get(term).map_or(0, |stat| stat.doc_freq)
    }

    /// Total occurrences of `term` across the corpus
    #[inline]
    pub fn get_total_freq(&self, term: &str) -> u64 {
        self.term_counts.get(term).map_or(0, |stat| stat.total_freq)
    }

    /// Number of unique terms seen
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Select the vocabulary: the `max_features` terms with the highest total
    /// frequency (ties by term ascending), returned in lexicographic order.
    pub fn top_terms(&self, max_features: usize) -> Vec<String> {
        let mut ranked: Vec<(&str, u64)> = self
            .term_counts
            .iter()
            .map(|(term, stat)| (term.as_str(), stat.total_freq))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.to_string()).collect();
        terms.sort_unstable();
        terms
    }
}
