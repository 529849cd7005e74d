//! Binary codec for `PositionList`.
//!
//! The on-disk/wire format is opaque to the rest of the core — only
//! `deserialize` is consumed by executors, and only through the `get`/
//! `iterator` calls on an `IndexAccess` implementation. This module backs
//! the two concrete adapters shipped in this crate (`InMemoryIndexAccess`
//! stores `PositionList` directly and never touches this codec;
//! `SqliteIndexAccess` stores rows as `serialize`d blobs and calls
//! `deserialize` on read).

use anyhow::{anyhow, Context, Result};

use crate::model::{Position, PositionList};

/// Serialize a `PositionList` to its opaque byte representation.
pub fn serialize(list: &PositionList) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + list.len() * 16);
    out.extend_from_slice(&(list.len() as u32).to_le_bytes());
    for pos in list.iter() {
        out.extend_from_slice(&pos.document_id.to_le_bytes());
        out.extend_from_slice(&pos.sentence_id.to_le_bytes());
        out.extend_from_slice(&pos.begin_char.to_le_bytes());
        out.extend_from_slice(&pos.end_char.to_le_bytes());
    }
    out
}

/// Deserialize a `PositionList` from its opaque byte representation.
///
/// Corruption (truncated buffer, bad length prefix) surfaces as a plain
/// `anyhow::Error`; callers at the executor boundary wrap it into
/// `QueryError::IndexAccessError`.
pub fn deserialize(bytes: &[u8]) -> Result<PositionList> {
    if bytes.len() < 4 {
        return Err(anyhow!("position list buffer shorter than length prefix"));
    }
    let count = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let mut offset = 4usize;
    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        let end = offset + 16;
        let chunk = bytes
            .get(offset..end)
            .context("position list buffer truncated")?;
        let document_id = i32::from_le_bytes(chunk[0..4].try_into().unwrap());
        let sentence_id = i32::from_le_bytes(chunk[4..8].try_into().unwrap());
        let begin_char = i32::from_le_bytes(chunk[8..12].try_into().unwrap());
        let end_char = i32::from_le_bytes(chunk[12..16].try_into().unwrap());
        positions.push(Position {
            document_id,
            sentence_id,
            begin_char,
            end_char,
            source_tag: None,
        });
        offset = end;
    }
    Ok(PositionList::new(positions))
}
