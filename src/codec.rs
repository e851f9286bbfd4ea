// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Entry Codec.
//!
//! Encodes an [`Entry`] into the exact byte sequence the server builds its
//! entry hash tree leaves from. Any divergence from the server's encoding
//! makes every inclusion proof fail, so the layout is fixed:
//!
//! ```text
//! Plain:      0x00 | key_len (u32 LE) | key | value
//! Reference:  0x01 | ref_key_len (u32 LE) | reference_key
//!                  | referenced_tx (u64 LE) | referenced_key
//! ```
//!
//! The length prefix on the first field makes the boundary unambiguous; the
//! trailing field runs to the end of the leaf.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::CodecError;
use crate::types::Entry;

pub const PLAIN_MARKER: u8 = 0x00;
pub const REFERENCE_MARKER: u8 = 0x01;

pub fn encode_leaf(entry: &Entry) -> Result<Vec<u8>, CodecError> {
    match entry {
        Entry::Plain { key, value } => {
            let key_len = length_prefix(key)?;
            let mut buf = Vec::with_capacity(1 + 4 + key.len() + value.len());
            buf.push(PLAIN_MARKER);
            buf.write_u32::<LittleEndian>(key_len)?;
            buf.extend_from_slice(key);
            buf.extend_from_slice(value);
            Ok(buf)
        }
        Entry::Reference {
            reference_key,
            referenced_key,
            referenced_tx,
        } => {
            let key_len = length_prefix(reference_key)?;
            let mut buf =
                Vec::with_capacity(1 + 4 + reference_key.len() + 8 + referenced_key.len());
            buf.push(REFERENCE_MARKER);
            buf.write_u32::<LittleEndian>(key_len)?;
            buf.extend_from_slice(reference_key);
            buf.write_u64::<LittleEndian>(*referenced_tx)?;
            buf.extend_from_slice(referenced_key);
            Ok(buf)
        }
    }
}

pub fn decode_leaf(leaf: &[u8]) -> Result<Entry, CodecError> {
    let mut cursor = Cursor::new(leaf);

    let marker = cursor.read_u8()?;
    if marker != PLAIN_MARKER && marker != REFERENCE_MARKER {
        return Err(CodecError::UnknownMarker(marker));
    }
    let key_len = cursor.read_u32::<LittleEndian>()? as usize;

    let start = cursor.position() as usize;
    if leaf.len() - start < key_len {
        return Err(CodecError::Truncated);
    }
    let mut key = vec![0u8; key_len];
    cursor.read_exact(&mut key)?;

    match marker {
        PLAIN_MARKER => {
            let mut value = Vec::new();
            cursor.read_to_end(&mut value)?;
            Ok(Entry::Plain { key, value })
        }
        _ => {
            let referenced_tx = cursor.read_u64::<LittleEndian>()?;
            let mut referenced_key = Vec::new();
            cursor.read_to_end(&mut referenced_key)?;
            Ok(Entry::Reference {
                reference_key: key,
                referenced_key,
                referenced_tx,
            })
        }
    }
}

fn length_prefix(key: &[u8]) -> Result<u32, CodecError> {
    u32::try_from(key.len()).map_err(|_| CodecError::KeyTooLong(key.len()))
}
