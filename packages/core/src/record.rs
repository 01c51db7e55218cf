//! # Persisted Record Codec
//!
//! The slot holds a JSON array of anchor records. Decoding is per record:
//! every element is checked against the record schema on its own, and a
//! failing element is reported and skipped while its neighbours load.

use std::collections::HashSet;

use serde_json::Value;

use crate::{Anchor, RecordError};

/// Result of decoding one slot
#[derive(Debug, Default)]
pub struct DecodedRecords {
    /// Well-formed anchors, in persisted order
    pub anchors: Vec<Anchor>,

    /// Records that were dropped
    pub rejected: Vec<RecordError>,

    /// The slot held something other than an array
    pub malformed_slot: bool,
}

/// Decode a persisted slot value into anchors
pub fn decode_records(value: Value) -> DecodedRecords {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return DecodedRecords::default(),
        _ => {
            return DecodedRecords {
                malformed_slot: true,
                ..DecodedRecords::default()
            }
        }
    };

    let mut decoded = DecodedRecords::default();
    let mut seen = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Anchor>(item) {
            Ok(anchor) => {
                if seen.insert(anchor.id().clone()) {
                    decoded.anchors.push(anchor);
                } else {
                    decoded.rejected.push(RecordError::DuplicateId {
                        index,
                        id: anchor.id().clone(),
                    });
                }
            }
            Err(e) => decoded.rejected.push(RecordError::Malformed {
                index,
                reason: e.to_string(),
            }),
        }
    }

    decoded
}

/// Encode anchors as the slot value
pub fn encode_records(anchors: &[Anchor]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(anchors)
}
