pub mod corpus;
pub mod stopwords;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::{corpus::Corpus, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, token::TokenFrequency};

/// 語彙数の上限
pub const MAX_FEATURES: usize = 2000;

/// 学習済みの重み付けモデル
///
/// 語彙 (列順) と列ごとの IDF を持ちます
/// 一度 fit したら次の retrain まで変更しません
/// `E` は fit に使ったエンジンで、射影にも同じものを使います
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TermWeightingModel<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    /// 語彙。index がそのまま列番号
    vocabulary: IndexSet<String>,
    /// IDF Vector
    idf: Vec<f32>,
    #[serde(skip)]
    _marker: PhantomData<E>,
}

impl<E> TermWeightingModel<E>
where
    E: TFIDFEngine,
{
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    /// 列番号 -> term
    pub fn term(&self, column: usize) -> Option<&str> {
        self.vocabulary.get_index(column).map(String::as_str)
    }

    /// term -> 列番号
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    /// テキストを学習済み空間に射影します
    /// 語彙外の token は落ち、結果は L2 正規化済み
    pub fn transform(&self, text: &str) -> ZeroSpVec<f32> {
        self.weigh(&TokenFrequency::from_text(text))
    }

    fn weigh(&self, freq: &TokenFrequency) -> ZeroSpVec<f32> {
        let tf = E::tf_vec(freq, &self.vocabulary);
        let pairs: Vec<(u32, f32)> = tf
            .raw_iter()
            .map(|(idx, &count)| (idx as u32, count * self.idf[idx]))
            .collect();
        ZeroSpVec::from_pairs(self.vocab_size(), pairs).l2_normalized()
    }

    /// 永続化データとの整合チェック
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf length {} does not match vocabulary size {}",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        if let Some(pos) = self.idf.iter().position(|v| !v.is_finite()) {
            return Err(format!("idf of column {pos} is not finite"));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn idf_mut(&mut self) -> &mut Vec<f32> {
        &mut self.idf
    }
}

/// ドキュメント x 語彙 の TF-IDF 行列
/// 行は L2 正規化済みの疎ベクトル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    n_cols: usize,
    rows: Vec<ZeroSpVec<f32>>,
}

impl DocumentTermMatrix {
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn rows(&self) -> &[ZeroSpVec<f32>] {
        &self.rows
    }

    /// 非ゼロ要素の総数
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(ZeroSpVec::nnz).sum()
    }

    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        for (pos, row) in self.rows.iter().enumerate() {
            if row.len() != self.n_cols {
                return Err(format!(
                    "row {pos} has length {} but matrix has {} columns",
                    row.len(),
                    self.n_cols
                ));
            }
            if row.values().iter().any(|v| !v.is_finite()) {
                return Err(format!("row {pos} has a non-finite weight"));
            }
        }
        Ok(())
    }
}

/// TF-IDF Vectorizer
///
/// コーパスから `TermWeightingModel` と `DocumentTermMatrix` を作ります
/// 英語ストップワードを除き、語彙上限は既定で `MAX_FEATURES` (`with_max_features` で変更)
#[derive(Debug, Clone)]
pub struct Vectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    max_features: usize,
    _marker: PhantomData<E>,
}

impl Default for Vectorizer<DefaultTFIDFEngine> {
    fn default() -> Self {
        Vectorizer::new()
    }
}

impl<E> Vectorizer<E>
where
    E: TFIDFEngine,
{
    pub fn new() -> Self {
        Vectorizer {
            max_features: MAX_FEATURES,
            _marker: PhantomData,
        }
    }

    /// 語彙上限を変えたもの
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// コーパスを fit して (モデル, 行列) を返します
    ///
    /// # Errors
    /// ドキュメントが 0 件、または語彙が空になる場合は `DataInsufficient`
    pub fn fit<T>(&self, documents: &[T]) -> Result<(TermWeightingModel<E>, DocumentTermMatrix)>
    where
        T: AsRef<str>,
    {
        if documents.is_empty() {
            return Err(EngineError::DataInsufficient("corpus has no documents"));
        }

        let freqs: Vec<TokenFrequency> = documents
            .iter()
            .map(|doc| TokenFrequency::from_text(doc.as_ref()))
            .collect();
        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }

        let vocabulary: IndexSet<String> = corpus.top_terms(self.max_features).into_iter().collect();
        if vocabulary.is_empty() {
            return Err(EngineError::DataInsufficient("corpus has no terms after stopword removal"));
        }
        debug!(
            documents = freqs.len(),
            seen_terms = corpus.vocab_size(),
            vocabulary = vocabulary.len(),
            "fitting tf-idf model"
        );

        let idf = E::idf_vec(&corpus, &vocabulary);
        let model = TermWeightingModel {
            vocabulary,
            idf,
            _marker: PhantomData,
        };
        let rows = freqs.iter().map(|freq| model.weigh(freq)).collect();
        let matrix = DocumentTermMatrix {
            n_cols: model.vocab_size(),
            rows,
        };
        Ok((model, matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: [&str; 3] = [
        "Software Engineer Java Python SQL Docker Kubernetes",
        "Full Stack Developer React Node.js TypeScript MongoDB",
        "DevOps Engineer CI/CD Jenkins AWS Terraform Linux",
    ];

    #[test]
    fn fit_shapes_follow_corpus() {
        let (model, matrix) = Vectorizer::default().fit(&DOCS).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), model.vocab_size());
        assert_eq!(model.idf().len(), model.vocab_size());
        assert!(model.column_of("kubernetes").is_some());
        assert!(model.column_of("full").is_none());
    }

    #[test]
    fn vocabulary_is_sorted() {
        let (model, _) = Vectorizer::default().fit(&DOCS).unwrap();
        let terms: Vec<&str> = (0..model.vocab_size()).filter_map(|i| model.term(i)).collect();
        let mut sorted = terms.clone();
        sorted.sort_unstable();
        assert_eq!(terms, sorted);
    }

    #[test]
    fn rows_are_unit_length() {
        let (_, matrix) = Vectorizer::default().fit(&DOCS).unwrap();
        for row in matrix.rows() {
            assert!((row.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn shared_terms_weigh_less() {
        let (model, matrix) = Vectorizer::default().fit(&DOCS).unwrap();
        let engineer = model.column_of("engineer").unwrap();
        let java = model.column_of("java").unwrap();
        assert!(model.idf()[engineer] < model.idf()[java]);
        assert!(matrix.rows()[0].get(engineer) < matrix.rows()[0].get(java));
    }

    #[test]
    fn max_features_caps_vocabulary() {
        let (model, matrix) = Vectorizer::default().with_max_features(4).fit(&DOCS).unwrap();
        assert_eq!(model.vocab_size(), 4);
        assert_eq!(matrix.n_cols(), 4);
        // engineer is the only term seen twice
        assert!(model.column_of("engineer").is_some());
    }

    #[test]
    fn empty_corpus_is_insufficient() {
        let empty: [&str; 0] = [];
        let err = Vectorizer::default().fit(&empty).unwrap_err();
        assert!(matches!(err, EngineError::DataInsufficient(_)));
    }

    #[test]
    fn stopword_only_corpus_is_insufficient() {
        let err = Vectorizer::default().fit(&["the and of", "a an"]).unwrap_err();
        assert!(matches!(err, EngineError::DataInsufficient(_)));
    }

    #[test]
    fn transform_matches_fitted_row() {
        let (model, matrix) = Vectorizer::default().fit(&DOCS).unwrap();
        let projected = model.transform(DOCS[1]);
        assert!((projected.cosine_similarity(&matrix.rows()[1]) - 1.0).abs() < 1e-5);
    }

    /// tf を 0/1 にするエンジン
    #[derive(Debug, Clone, PartialEq)]
    struct BinaryTfEngine;

    impl TFIDFEngine for BinaryTfEngine {
        fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<String>) -> Vec<f32> {
            DefaultTFIDFEngine::idf_vec(corpus, vocabulary)
        }

        fn tf_vec(freq: &TokenFrequency, vocabulary: &IndexSet<String>) -> ZeroSpVec<f32> {
            let pairs = freq
                .iter()
                .filter_map(|(token, _)| vocabulary.get_index_of(token).map(|idx| (idx as u32, 1.0)))
                .collect();
            ZeroSpVec::from_pairs(vocabulary.len(), pairs)
        }
    }

    #[test]
    fn transform_uses_the_fitting_engine() {
        let docs = ["java java java python", "rust docker"];
        let (model, matrix) = Vectorizer::<BinaryTfEngine>::new().fit(&docs).unwrap();
        let projected = model.transform(docs[0]);
        assert!((projected.cosine_similarity(&matrix.rows()[0]) - 1.0).abs() < 1e-6);
        // 重み付けが違えば 1 にならない
        let (default_model, _) = Vectorizer::default().fit(&docs).unwrap();
        let other = default_model.transform(docs[0]);
        assert!(other.cosine_similarity(&matrix.rows()[0]) < 0.99);
    }

    #[test]
    fn non_finite_weights_fail_checks() {
        let (mut model, _) = Vectorizer::default().fit(&DOCS).unwrap();
        assert!(model.check().is_ok());
        model.idf_mut()[0] = f32::NAN;
        assert!(model.check().is_err());
    }

    #[test]
    fn transform_drops_unknown_terms() {
        let (model, _) = Vectorizer::default().fit(&DOCS).unwrap();
        assert!(model.transform("haskell erlang").is_zero());
        assert!(model.transform("").is_zero());
    }
}
