//! Canonical Encoding Module
//!
//! Defines the byte-encoding capabilities keys and values must provide, and
//! the length-prefixed binary snapshot format built on top of them.
//!
//! Key encoding feeds both shard routing (it is what gets hashed) and
//! snapshot export; value encoding is used for snapshot export only. Every
//! snapshot field is length-prefixed so the stream is self-delimiting and
//! round-trippable:
//!
//! ```text
//! entry := value_len (u32 BE) | value_bytes | key_len (u32 BE) | key_bytes
//! ```
//!
//! Value bytes come first, matching the dump layout consumers already parse.

use std::hash::Hash;
use std::io::Write;

use tracing::warn;

use crate::error::{DecodeError, EncodeError, SnapshotError};

// == Key Capability ==
/// Capabilities a cache key must provide: equality, hashability, and an
/// infallible canonical byte encoding.
///
/// The encoding must be deterministic — routing relies on equal keys
/// producing identical bytes.
pub trait CacheKey: Clone + Eq + Hash + Send + Sync + 'static {
    /// Appends the key's canonical byte encoding to `buf`.
    fn encode(&self, buf: &mut Vec<u8>);

    /// Reconstructs a key from its canonical byte encoding.
    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError>;

    /// Returns the canonical encoding as an owned buffer.
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

// == Value Capability ==
/// Capabilities a cache value must provide: a canonical byte encoding.
///
/// Unlike key encoding, value encoding may fail (e.g. serialization of a
/// structured payload); snapshot export skips such entries.
pub trait CacheValue: Clone + Send + Sync + 'static {
    /// Appends the value's canonical byte encoding to `buf`.
    fn encode(&self, buf: &mut Vec<u8>) -> std::result::Result<(), EncodeError>;

    /// Reconstructs a value from its canonical byte encoding.
    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError>;
}

// == Standard Key Impls ==
impl CacheKey for u64 {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }

    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        let arr: [u8; 8] = bytes
            .try_into()
            .map_err(|_| DecodeError::new(format!("expected 8 key bytes, got {}", bytes.len())))?;
        Ok(u64::from_be_bytes(arr))
    }
}

impl CacheKey for String {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }

    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DecodeError::new(format!("key is not valid UTF-8: {e}")))
    }
}

// == Standard Value Impls ==
impl CacheValue for String {
    fn encode(&self, buf: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        buf.extend_from_slice(self.as_bytes());
        Ok(())
    }

    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DecodeError::new(format!("value is not valid UTF-8: {e}")))
    }
}

impl CacheValue for Vec<u8> {
    fn encode(&self, buf: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        buf.extend_from_slice(self);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        Ok(bytes.to_vec())
    }
}

// == Dump Report ==
/// Outcome of a snapshot export.
///
/// Per-entry encode failures are aggregated here rather than aborting the
/// stream; only a sink failure aborts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// Entries written to the sink
    pub entries_written: usize,
    /// Entries skipped because their value failed to encode
    pub entries_skipped: usize,
}

impl DumpReport {
    /// Merges another report into this one (used when concatenating shard dumps).
    pub fn merge(&mut self, other: &DumpReport) {
        self.entries_written += other.entries_written;
        self.entries_skipped += other.entries_skipped;
    }
}

// == Snapshot Writer ==
/// Streams `entries` to `sink` in the length-prefixed snapshot format.
///
/// An entry whose value fails to encode is skipped and counted in the report;
/// a sink write failure aborts the export and surfaces the error. Partially
/// written output is the caller's responsibility to discard.
pub fn write_entries<K, V, W>(
    sink: &mut W,
    entries: &[(K, V)],
) -> std::result::Result<DumpReport, SnapshotError>
where
    K: CacheKey,
    V: CacheValue,
    W: Write,
{
    let mut report = DumpReport::default();
    let mut value_buf = Vec::new();
    let mut key_buf = Vec::new();

    for (key, value) in entries {
        value_buf.clear();
        if let Err(err) = value.encode(&mut value_buf) {
            warn!("skipping snapshot entry, value failed to encode: {err}");
            report.entries_skipped += 1;
            continue;
        }
        key_buf.clear();
        key.encode(&mut key_buf);

        sink.write_all(&(value_buf.len() as u32).to_be_bytes())?;
        sink.write_all(&value_buf)?;
        sink.write_all(&(key_buf.len() as u32).to_be_bytes())?;
        sink.write_all(&key_buf)?;
        report.entries_written += 1;
    }

    Ok(report)
}

// == Snapshot Reader ==
/// Decodes a snapshot stream back into entry pairs.
///
/// Used by backup verification and tests; the service itself only exports.
pub fn read_entries<K, V>(bytes: &[u8]) -> std::result::Result<Vec<(K, V)>, SnapshotError>
where
    K: CacheKey,
    V: CacheValue,
{
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let entry_start = offset;
        let value_bytes = read_field(bytes, &mut offset)?;
        let value = V::decode(value_bytes).map_err(|source| SnapshotError::Corrupt {
            offset: entry_start,
            source,
        })?;
        let key_bytes = read_field(bytes, &mut offset)?;
        let key = K::decode(key_bytes).map_err(|source| SnapshotError::Corrupt {
            offset: entry_start,
            source,
        })?;
        entries.push((key, value));
    }

    Ok(entries)
}

/// Reads one length-prefixed field, advancing `offset` past it.
fn read_field<'a>(
    bytes: &'a [u8],
    offset: &mut usize,
) -> std::result::Result<&'a [u8], SnapshotError> {
    let len_end = *offset + 4;
    let prefix = bytes
        .get(*offset..len_end)
        .ok_or(SnapshotError::Truncated(*offset))?;
    let len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;

    let field_end = len_end + len;
    let field = bytes
        .get(len_end..field_end)
        .ok_or(SnapshotError::Truncated(len_end))?;
    *offset = field_end;
    Ok(field)
}
