//! Binary state blobs for host save/restore.
//!
//! Layout: 4-byte magic, little-endian u32 payload length, then a JSON
//! document `{"tag": "Parameters", "params": {"<id>": <value>, ...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::{ParamSnapshot, DECAY_TIME, ROOM_SIZE};

pub const STATE_MAGIC: [u8; 4] = *b"SRVB";
/// Outer tag identifying the parameter schema.
pub const STATE_TAG: &str = "Parameters";
const HEADER_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state blob is {0} bytes, shorter than its header claims")]
    Truncated(usize),
    #[error("unrecognised state header")]
    BadMagic,
    #[error("state payload of {0} bytes does not fit in a blob")]
    TooLarge(usize),
    #[error("malformed state payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("state tag {0:?} does not match the parameter schema")]
    TagMismatch(String),
    #[error("state has no value for {0}")]
    MissingParam(&'static str),
    #[error("state value for {0} is not a finite number")]
    NonFinite(&'static str),
}

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    tag: String,
    params: BTreeMap<String, f32>,
}

/// Serialize a snapshot to an opaque blob.
pub fn encode_state(snapshot: &ParamSnapshot) -> Result<Vec<u8>, StateError> {
    let doc = StateDocument {
        tag: STATE_TAG.to_string(),
        params: BTreeMap::from([
            (ROOM_SIZE.id.to_string(), snapshot.room_size),
            (DECAY_TIME.id.to_string(), snapshot.decay_time),
        ]),
    };
    let payload = serde_json::to_vec(&doc)?;
    let len = u32::try_from(payload.len()).map_err(|_| StateError::TooLarge(payload.len()))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(&STATE_MAGIC);
    blob.extend_from_slice(&len.to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Parse a blob produced by [`encode_state`].
///
/// Values are clamped into their declared ranges. Keys for unknown
/// parameters are ignored; a missing known parameter fails the whole blob.
pub fn decode_state(data: &[u8]) -> Result<ParamSnapshot, StateError> {
    if data.len() < HEADER_LEN {
        return Err(StateError::Truncated(data.len()));
    }
    if data[..4] != STATE_MAGIC {
        return Err(StateError::BadMagic);
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&data[4..HEADER_LEN]);
    let len = u32::from_le_bytes(len_bytes) as usize;
    let payload = HEADER_LEN
        .checked_add(len)
        .and_then(|end| data.get(HEADER_LEN..end))
        .ok_or(StateError::Truncated(data.len()))?;

    let doc: StateDocument = serde_json::from_slice(payload)?;
    if doc.tag != STATE_TAG {
        return Err(StateError::TagMismatch(doc.tag));
    }

    let value = |id: &'static str| -> Result<f32, StateError> {
        let v = doc
            .params
            .get(id)
            .copied()
            .ok_or(StateError::MissingParam(id))?;
        if !v.is_finite() {
            return Err(StateError::NonFinite(id));
        }
        Ok(v)
    };

    Ok(ParamSnapshot {
        room_size: value(ROOM_SIZE.id)?,
        decay_time: value(DECAY_TIME.id)?,
    }
    .clamped())
}
