//! JSON bodies of the produce and consume endpoints
//!
//! Missing fields decode to their zero value and unknown fields are ignored.

use crate::log::Record;
use serde::{Deserialize, Serialize};

/// Body of `POST /`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceRequest {
    #[serde(default)]
    pub record: Record,
}

/// Response of `POST /`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub offset: u64,
}

/// Body of `GET /`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeRequest {
    #[serde(default)]
    pub offset: u64,
}

/// Response of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub record: Record,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names_do_not_collide() {
        let request = ProduceRequest {
            record: Record::new("hi"),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({ "record": { "value": "aGk=", "offset": 0 } }));

        let encoded = serde_json::to_value(ProduceResponse { offset: 3 }).unwrap();
        assert_eq!(encoded, json!({ "offset": 3 }));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let request: ConsumeRequest =
            serde_json::from_str(r#"{"offset": 5, "extra": true}"#).unwrap();
        assert_eq!(request.offset, 5);
    }

    #[test]
    fn test_negative_offset_rejected() {
        assert!(serde_json::from_str::<ConsumeRequest>(r#"{"offset": -1}"#).is_err());
    }
}
