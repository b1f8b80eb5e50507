use indexmap::IndexSet;

use crate::{utils::math::vector::ZeroSpVec, vectorizer::{corpus::Corpus, token::TokenFrequency}};

/// TF-IDF 計算エンジン
///
/// 語彙 (列の並び) に対する IDF ベクトルと、1 ドキュメントの TF ベクトルを生成します
/// 重み付けの差し替え点です
pub trait TFIDFEngine {
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `corpus` - コーパス
    /// * `vocabulary` - 語彙。順序がそのまま列になる
    /// # Returns
    /// * `Vec<f32>` - IDFベクトル (長さは語彙数)
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<String>) -> Vec<f32>;

    /// TFベクトルを生成するメソッド
    /// 語彙外の token は落とします
    fn tf_vec(freq: &TokenFrequency, vocabulary: &IndexSet<String>) -> ZeroSpVec<f32>;
}

/// デフォルトのTF-IDFエンジン
///
/// - tf: 生の出現回数
/// - idf: `ln((1 + n) / (1 + df)) + 1` (smooth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<String>) -> Vec<f32> {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .iter()
            .map(|term| Self::idf_calc(doc_num, corpus.get_doc_freq(term)) as f32)
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, vocabulary: &IndexSet<String>) -> ZeroSpVec<f32> {
        let pairs: Vec<(u32, f32)> = freq
            .iter()
            .filter_map(|(token, count)| {
                vocabulary
                    .get_index_of(token)
                    .map(|idx| (idx as u32, count as f32))
            })
            .collect();
        ZeroSpVec::from_pairs(vocabulary.len(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> IndexSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn idf_is_smoothed() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&TokenFrequency::from_text("rust docker"));
        corpus.add_doc(&TokenFrequency::from_text("rust"));
        let idf = DefaultTFIDFEngine::idf_vec(&corpus, &vocab(&["docker", "rust", "unseen"]));
        assert!((idf[0] as f64 - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-6);
        assert!((idf[1] - 1.0).abs() < 1e-6);
        assert!((idf[2] as f64 - (3.0f64.ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn tf_drops_out_of_vocabulary_terms() {
        let freq = TokenFrequency::from_text("rust rust kotlin docker");
        let tf = DefaultTFIDFEngine::tf_vec(&freq, &vocab(&["docker", "rust"]));
        assert_eq!(tf.len(), 2);
        assert_eq!(tf.get(0), 1.0);
        assert_eq!(tf.get(1), 2.0);
    }

    #[test]
    fn tf_of_disjoint_text_is_zero() {
        let freq = TokenFrequency::from_text("kotlin scala");
        assert!(DefaultTFIDFEngine::tf_vec(&freq, &vocab(&["rust"])).is_zero());
    }
}
