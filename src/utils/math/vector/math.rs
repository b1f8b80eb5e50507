use std::cmp::Ordering;

use num::{Float, Num, NumCast};

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// ドット積
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// 疎な index 同士のマージで計算します
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );
        let (a_ind, a_val) = (self.indices(), self.values());
        let (b_ind, b_val) = (other.indices(), other.values());
        if a_ind.is_empty() || b_ind.is_empty() {
            return 0.0;
        }

        let mut i = 0;
        let mut j = 0;
        let mut result = 0.0_f64;
        while i < a_ind.len() && j < b_ind.len() {
            match a_ind[i].cmp(&b_ind[j]) {
                Ordering::Equal => {
                    let a: f64 = a_val[i].into();
                    let b: f64 = b_val[j].into();
                    result += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// ||a||^2
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.values()
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    ///
    /// どちらかがゼロベクトルの場合は 0.0 (未定義を 0 として扱う)
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        let norm_a = self.norm_sq();
        let norm_b = other.norm_sq();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot(other) / (norm_a.sqrt() * norm_b.sqrt())
    }
}

impl<N> ZeroSpVec<N>
where
    N: Float + Into<f64>,
{
    /// L2 正規化したベクトルを返します
    /// ゼロベクトルはそのまま返します
    pub fn l2_normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        let inv = <N as NumCast>::from(1.0 / norm).unwrap_or_else(N::one);
        let val = self.values().iter().map(|&v| v * inv).collect();
        ZeroSpVec::from_raw_parts(self.len(), self.indices().to_vec(), val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(len: usize, pairs: &[(u32, f32)]) -> ZeroSpVec<f32> {
        ZeroSpVec::from_pairs(len, pairs.to_vec())
    }

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = vec_of(5, &[(0, 1.0), (2, 2.0), (4, 3.0)]);
        let b = vec_of(5, &[(1, 5.0), (2, 4.0), (4, 1.0)]);
        assert!((a.dot(&b) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a = vec_of(3, &[(0, 1.0), (2, 2.0)]);
        let b = vec_of(3, &[(0, 2.0), (2, 4.0)]);
        assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_disjoint_vectors_is_zero() {
        let a = vec_of(4, &[(0, 1.0)]);
        let b = vec_of(4, &[(3, 1.0)]);
        assert_eq!(a.cosine_similarity(&b), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = vec_of(4, &[(0, 1.0)]);
        let zero = ZeroSpVec::<f32>::new(4);
        assert_eq!(a.cosine_similarity(&zero), 0.0);
        assert_eq!(zero.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn l2_normalized_has_unit_norm() {
        let a = vec_of(3, &[(0, 3.0), (1, 4.0)]);
        let n = a.l2_normalized();
        assert!((n.norm() - 1.0).abs() < 1e-6);
        assert!((n.get(0) - 0.6).abs() < 1e-6);
        assert!(ZeroSpVec::<f32>::new(3).l2_normalized().is_zero());
    }
}
