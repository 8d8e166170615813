//! Record type stored in the log

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single immutable entry of the log.
///
/// `offset` is assigned by [`Log::append`](crate::log::Log::append); any value
/// a caller puts here before appending is overwritten. On the wire the payload
/// is a base64 string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, with = "base64_bytes")]
    pub value: Bytes,

    #[serde(default)]
    pub offset: u64,
}

impl Record {
    /// Build a record from a payload; the offset is left for the log to assign
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            offset: 0,
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use bytes::Bytes;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        // null decodes to an empty payload
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        BASE64
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(|e| de::Error::custom(format!("invalid base64 payload: {}", e)))
    }
}
