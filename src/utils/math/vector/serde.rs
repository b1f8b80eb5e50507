use num::Num;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ZeroSpVec;

impl<N> Serialize for ZeroSpVec<N>
where
    N: Num + Copy + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // len, ind, val の 3 フィールド
        let mut state = serializer.serialize_struct("ZeroSpVec", 3)?;
        state.serialize_field("len", &(self.len() as u64))?;
        state.serialize_field("ind", self.indices())?;
        state.serialize_field("val", self.values())?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for ZeroSpVec<N>
where
    N: Num + Copy + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ZeroSpVecData<N> {
            len: u64,
            ind: Vec<u32>,
            val: Vec<N>,
        }

        let data = ZeroSpVecData::<N>::deserialize(deserializer)?;
        let len = data.len as usize;
        if data.ind.len() != data.val.len() {
            return Err(DeError::custom("ZeroSpVec deserialize error: ind and val length mismatch"));
        }
        // 昇順・重複なし・範囲内でなければ弾く
        if data.ind.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DeError::custom("ZeroSpVec deserialize error: indices are not strictly ascending"));
        }
        if data.ind.last().is_some_and(|&last| last as usize >= len) {
            return Err(DeError::custom("ZeroSpVec deserialize error: index out of range"));
        }
        Ok(ZeroSpVec::from_raw_parts(len, data.ind, data.val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_roundtrip_preserves_entries() {
        let v = ZeroSpVec::from_pairs(8, vec![(7, 0.25f32), (1, 0.5)]);
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let de: ZeroSpVec<f32> = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(de, v);
    }

    #[test]
    fn rejects_unsorted_indices() {
        let bad = serde_json::json!({ "len": 4, "ind": [2, 1], "val": [1.0, 1.0] });
        assert!(serde_json::from_value::<ZeroSpVec<f32>>(bad).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let bad = serde_json::json!({ "len": 2, "ind": [0, 2], "val": [1.0, 1.0] });
        assert!(serde_json::from_value::<ZeroSpVec<f32>>(bad).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let bad = serde_json::json!({ "len": 4, "ind": [0, 1], "val": [1.0] });
        assert!(serde_json::from_value::<ZeroSpVec<f32>>(bad).is_err());
    }
}
