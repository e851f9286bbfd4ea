//! On-disk trust anchor record.
//!
//! ```text
//! [MAGIC "LTA1"][VERSION u32][ID_LEN u32][IDENTITY]
//! [TX_ID u64][TX_HASH 32][SIG_LEN u32][SIGNATURE][CRC64 u64]
//! ```
//!
//! All integers little-endian. The CRC covers every preceding byte.

use crate::error::{PersistenceError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest;
use ledger_trust::TrustAnchor;
use std::io::{Cursor, Read};

pub const MAGIC: [u8; 4] = *b"LTA1";
pub const VERSION: u32 = 1;

const TRAILER_LEN: usize = 8;
const MIN_LEN: usize = 4 + 4 + 4 + 8 + 32 + 4 + TRAILER_LEN;

pub fn encode(anchor: &TrustAnchor) -> Result<Vec<u8>> {
    let identity = anchor.server_identity.as_bytes();
    let id_len = u32::try_from(identity.len())
        .map_err(|_| PersistenceError::InvalidFormat("identity too long".into()))?;
    let sig_len = u32::try_from(anchor.signature.len())
        .map_err(|_| PersistenceError::InvalidFormat("signature too long".into()))?;

    let mut buf = Vec::with_capacity(MIN_LEN + identity.len() + anchor.signature.len());
    buf.extend_from_slice(&MAGIC);
    buf.write_u32::<LittleEndian>(VERSION)?;
    buf.write_u32::<LittleEndian>(id_len)?;
    buf.extend_from_slice(identity);
    buf.write_u64::<LittleEndian>(anchor.tx_id)?;
    buf.extend_from_slice(&anchor.tx_hash);
    buf.write_u32::<LittleEndian>(sig_len)?;
    buf.extend_from_slice(&anchor.signature);

    let mut digest = Digest::new();
    digest.write(&buf);
    buf.write_u64::<LittleEndian>(digest.sum64())?;

    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<TrustAnchor> {
    if bytes.len() < MIN_LEN {
        return Err(PersistenceError::InvalidFormat(format!(
            "record too short: {} bytes",
            bytes.len()
        )));
    }

    let (content, trailer) = bytes.split_at(bytes.len() - TRAILER_LEN);
    let stored = Cursor::new(trailer).read_u64::<LittleEndian>()?;
    let mut digest = Digest::new();
    digest.write(content);
    let found = digest.sum64();
    if found != stored {
        return Err(PersistenceError::ChecksumMismatch {
            expected: stored,
            found,
        });
    }

    let mut cursor = Cursor::new(content);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(PersistenceError::InvalidMagic);
    }

    let version = cursor.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }

    let id_len = cursor.read_u32::<LittleEndian>()? as usize;
    let identity = read_bytes(&mut cursor, id_len, "identity")?;
    let server_identity = String::from_utf8(identity)
        .map_err(|_| PersistenceError::InvalidFormat("identity is not utf-8".into()))?;

    let tx_id = cursor.read_u64::<LittleEndian>()?;
    let mut tx_hash = [0u8; 32];
    cursor.read_exact(&mut tx_hash)?;

    let sig_len = cursor.read_u32::<LittleEndian>()? as usize;
    let signature = read_bytes(&mut cursor, sig_len, "signature")?;

    if (cursor.position() as usize) != content.len() {
        return Err(PersistenceError::InvalidFormat("trailing bytes".into()));
    }

    Ok(TrustAnchor {
        server_identity,
        tx_id,
        tx_hash,
        signature,
    })
}

fn read_bytes(cursor: &mut Cursor<&[u8]>, len: usize, what: &str) -> Result<Vec<u8>> {
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(PersistenceError::InvalidFormat(format!(
            "{} claims {} bytes, {} left",
            what, len, remaining
        )));
    }
    let mut out = vec![0u8; len];
    cursor.read_exact(&mut out)?;
    Ok(out)
}
