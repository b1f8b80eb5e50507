use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::vectorizer::stopwords::is_stopword;

/// 2 文字以上の単語 (Unicode word)
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex")
});

/// テキストをトークン列に分割します
///
/// 小文字化 -> `\b\w\w+\b` で抽出 -> 英語ストップワードを除外
/// 学習時と射影時で必ず同じ処理を通すこと
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

///  TokenFrequency 構造体
/// 1 ドキュメント内の token の出現回数を管理します
/// TF の元データになります
///
/// # Examples
/// ```
/// use placement_similarity::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("rust");
/// token_freq.add_token("docker");
/// token_freq.add_token("rust");
///
/// assert_eq!(token_freq.token_count("rust"), 2);
/// assert_eq!(token_freq.token_sum(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Tokenの追加の実装
impl TokenFrequency {
    /// 新しいTokenFrequencyを作成するメソッド
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// テキストをトークン化して数え上げます
    pub fn from_text(text: &str) -> Self {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&tokenize(text));
        freq
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - 追加するトークンのスライス
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// 情報取得の実装
impl TokenFrequency {
    /// tokenの出現回数。未出現なら 0
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// 全tokenの出現回数の合計
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// ユニークなtoken数
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// (token, count) を初出順に返します
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}
