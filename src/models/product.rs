//! Product Record Module
//!
//! The catalog payload stored in the cache, with its canonical byte encoding.

use serde::{Deserialize, Serialize};

use crate::cache::CacheValue;
use crate::error::{DecodeError, EncodeError};

/// Identifier a product is cached and looked up under.
pub type ProductId = u64;

// == Product Record ==
/// One catalog entry as ingested and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name
    pub name: String,
    /// Product category
    pub category: String,
    /// Warehouse location
    #[serde(default)]
    pub location: String,
    /// Product color
    #[serde(default)]
    pub color: String,
    /// Unit price
    #[serde(default)]
    pub price: i64,
    /// Units in stock
    #[serde(default)]
    pub amount: i64,
}

// == Canonical Encoding ==
/// JSON is the record's canonical encoding: field order is fixed by the
/// struct, so equal records produce identical bytes.
impl CacheValue for ProductRecord {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
        let bytes = serde_json::to_vec(self).map_err(|e| EncodeError::new(e.to_string()))?;
        buf.extend_from_slice(&bytes);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes).map_err(|e| DecodeError::new(e.to_string()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProductRecord {
        ProductRecord {
            name: "desk lamp".to_string(),
            category: "lighting".to_string(),
            location: "aisle 3".to_string(),
            color: "black".to_string(),
            price: 2499,
            amount: 12,
        }
    }

    #[test]
    fn test_canonical_encoding_roundtrip() {
        let record = sample();
        let mut buf = Vec::new();
        record.encode(&mut buf).unwrap();

        let decoded = ProductRecord::decode(&buf).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_canonical_encoding_is_deterministic() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        sample().encode(&mut a).unwrap();
        sample().encode(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ProductRecord::decode(b"not json").is_err());
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"name":"chair","category":"furniture"}"#).unwrap();
        assert_eq!(record.name, "chair");
        assert_eq!(record.location, "");
        assert_eq!(record.price, 0);
    }
}
