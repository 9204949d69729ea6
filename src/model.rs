//! Album domain model
//!
//! The single resource served by this process. Every field is required when
//! decoding a request body; unknown fields are ignored.

use serde::{Deserialize, Serialize, Serializer};

/// Largest magnitude below which every whole `f64` is an exact integer
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// A row of the `albums` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Album {
    /// Caller-supplied primary key
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

/// Whole prices are written as JSON integers (`1`, not `1.0`)
#[allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::trivially_copy_pass_by_ref
)]
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && price.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_requires_every_field() {
        let missing_price = r#"{"id":"a1","title":"T","artist":"Ar"}"#;
        assert!(serde_json::from_str::<Album>(missing_price).is_err());

        let wrong_type = r#"{"id":"a1","title":"T","artist":"Ar","price":"9.99"}"#;
        assert!(serde_json::from_str::<Album>(wrong_type).is_err());
    }

    #[test]
    fn test_encode_is_compact_and_keeps_price() {
        let album = Album {
            id: "a1".to_string(),
            title: "T".to_string(),
            artist: "Ar".to_string(),
            price: 9.99,
        };
        let json = serde_json::to_string(&album).unwrap();
        assert_eq!(json, r#"{"id":"a1","title":"T","artist":"Ar","price":9.99}"#);
    }

    #[test]
    fn test_whole_prices_encode_as_integers() {
        let mut album = Album {
            id: "x".to_string(),
            title: "T".to_string(),
            artist: "Ar".to_string(),
            price: 1.0,
        };
        assert_eq!(
            serde_json::to_string(&album).unwrap(),
            r#"{"id":"x","title":"T","artist":"Ar","price":1}"#
        );

        album.price = -20.0;
        assert!(serde_json::to_string(&album).unwrap().ends_with(r#""price":-20}"#));

        album.price = 0.5;
        assert!(serde_json::to_string(&album).unwrap().ends_with(r#""price":0.5}"#));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let body = r#"{"id":"a1","title":"T","artist":"Ar","price":1,"label":"x"}"#;
        let album: Album = serde_json::from_str(body).unwrap();
        assert_eq!(album.id, "a1");
        assert!((album.price - 1.0).abs() < f64::EPSILON);
    }
}
