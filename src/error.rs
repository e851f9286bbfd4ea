//! Error types.

use thiserror::Error;

/// A server answer failed cryptographic or structural verification.
///
/// Every variant is tamper evidence of some kind. None of them may be
/// retried against the same anchor with an expectation of success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// The entry is not a leaf of the claimed entry-hash-tree root.
    #[error("inclusion proof does not bind the entry to the claimed root")]
    Inclusion,
    /// The accumulated hash of `target` is not derivable from `source`.
    #[error("consistency proof from tx {source_tx} to tx {target_tx} does not hold")]
    Consistency { source_tx: u64, target_tx: u64 },
    /// The response violates a structural invariant (wrong entry count, wrong key, ...).
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("key of {0} bytes exceeds the u32 length prefix")]
    KeyTooLong(usize),
    #[error("unknown leaf marker 0x{0:02x}")]
    UnknownMarker(u8),
    #[error("leaf truncated")]
    Truncated,
}

impl From<std::io::Error> for CodecError {
    fn from(_: std::io::Error) -> Self {
        CodecError::Truncated
    }
}

/// Failure of a trust state store backend. The anchor previously stored is
/// still authoritative when this is returned.
#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("state store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt trust state record: {0}")]
    Corrupt(String),
    #[error("state store lock poisoned")]
    Poisoned,
}
