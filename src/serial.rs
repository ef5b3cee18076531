//! Binary snapshots of merged access transformation sets.
//!
//! Build tooling merges rules from many sources and wants to skip that work
//! when nothing changed. A snapshot stores the merged set in canonical
//! (sorted) order behind a 32-byte header.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"ATSN"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Flags (u16, reserved)
//! 8       4     Payload length in bytes (u32, little-endian)
//! 12      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 28      4     Reserved
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The format version must match exactly; there is no migration path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AccessLevel, AccessTransformationSet, ElementReference};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"ATSN";
const FORMAT_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when writing a snapshot.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule set: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when reading a snapshot.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not an access transformer snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedSet {
    class_count: usize,
    entries: Vec<(ElementReference, AccessLevel)>,
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// BLAKE3 over the canonical text rendering of the set, one rule per line.
pub(crate) fn fingerprint(set: &AccessTransformationSet) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for (element, level) in set.entries() {
        hasher.update(format!("{level} {element}\n").as_bytes());
    }
    *hasher.finalize().as_bytes()
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // rule sets never approach 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
    buf.extend_from_slice(&[0u8; 4]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[12..28]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(set: &AccessTransformationSet) -> Result<Vec<u8>, SerializeError> {
    let serialized = SerializedSet {
        class_count: set.len(),
        entries: set.entries(),
    };
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<AccessTransformationSet, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedSet, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    let entry_count = serialized.entries.len();
    let mut set = AccessTransformationSet::new();
    for (element, level) in serialized.entries {
        set.add_minimum_access_level(element, level);
    }

    if set.len() != serialized.class_count {
        return Err(DeserializeError::Validation(format!(
            "expected {} classes, rebuilt {}",
            serialized.class_count,
            set.len()
        )));
    }
    if set.entries().len() != entry_count {
        return Err(DeserializeError::Validation(
            "duplicate entries in payload".to_owned(),
        ));
    }
    Ok(set)
}
