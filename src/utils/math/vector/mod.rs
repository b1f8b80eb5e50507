pub mod math;
pub mod serde;

use std::fmt::Debug;

use num::Num;

/// ZeroSpVec は 0 要素を省いた疎ベクトルです
/// indices と values を持ち、
/// indices は要素のインデックスを保持し、
/// values は要素の値を保持します
///
/// 要素は indices の昇順でソートされ、重複しないことを保証します
/// 値が 0 の要素は保持しません
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    ind: Vec<u32>,
    val: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// 長さ `len` の全要素 0 のベクトルを作成します
    #[inline]
    pub fn new(len: usize) -> Self {
        ZeroSpVec {
            ind: Vec::new(),
            val: Vec::new(),
            len,
        }
    }

    /// (index, value) の組からベクトルを作成します
    /// 入力の順序は問いません。同じ index は加算され、0 になった要素は捨てられます
    ///
    /// # Panics
    /// index が `len` 以上の場合
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.sort_unstable_by_key(|(idx, _)| *idx);
        let mut ind: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut val: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, v) in pairs {
            assert!((idx as usize) < len, "index {idx} out of range for length {len}");
            match ind.last() {
                Some(&last) if last == idx => {
                    let slot = val.len() - 1;
                    val[slot] = val[slot] + v;
                }
                _ => {
                    ind.push(idx);
                    val.push(v);
                }
            }
        }
        let mut vec = ZeroSpVec { ind, val, len };
        vec.prune_zeros();
        vec
    }

    /// 検証済みの生データから組み立てる
    /// 呼び出し側が昇順・重複なし・範囲内を保証すること
    pub(crate) fn from_raw_parts(len: usize, ind: Vec<u32>, val: Vec<N>) -> Self {
        debug_assert_eq!(ind.len(), val.len());
        ZeroSpVec { ind, val, len }
    }

    fn prune_zeros(&mut self) {
        if self.val.iter().all(|v| !v.is_zero()) {
            return;
        }
        let (ind, val): (Vec<u32>, Vec<N>) = self
            .ind
            .iter()
            .copied()
            .zip(self.val.iter().copied())
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        self.ind = ind;
        self.val = val;
    }

    /// 論理的な長さ (次元数)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// 非ゼロ要素数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.ind.len()
    }

    /// 全要素が 0 か
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.ind.is_empty()
    }

    /// index の値を取得します。疎な位置は 0
    pub fn get(&self, index: usize) -> N {
        match self.ind.binary_search(&(index as u32)) {
            Ok(pos) => self.val[pos],
            Err(_) => N::zero(),
        }
    }

    /// 非ゼロ要素を (index, &value) で昇順に返します
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, &N)> + '_ {
        self.ind.iter().map(|&i| i as usize).zip(self.val.iter())
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.ind
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.val
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "ZeroSpVec {{ len: {}, nnz: {}, entries: [", self.len, self.nnz())?;
            for (i, (idx, val)) in self.raw_iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{idx}: {val:?}")?;
            }
            write!(f, "] }}")
        } else {
            f.debug_struct("ZeroSpVec")
                .field("len", &self.len)
                .field("nnz", &self.nnz())
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_merges_and_drops_zeros() {
        let v = ZeroSpVec::from_pairs(6, vec![(4, 1.0f32), (1, 2.0), (4, 0.5), (2, 0.0)]);
        assert_eq!(v.len(), 6);
        assert_eq!(v.indices(), &[1, 4]);
        assert_eq!(v.values(), &[2.0, 1.5]);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.get(4), 1.5);
    }

    #[test]
    #[should_panic]
    fn from_pairs_rejects_out_of_range() {
        let _ = ZeroSpVec::from_pairs(2, vec![(2, 1.0f32)]);
    }

    #[test]
    fn empty_vector_is_zero() {
        let v: ZeroSpVec<f32> = ZeroSpVec::new(10);
        assert!(v.is_zero());
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.raw_iter().count(), 0);
    }
}
