use ledger_trust::StateStoreError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported record version {0}")]
    UnsupportedVersion(u32),
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        expected: u64,
        found: u64,
    },
    #[error("Record belongs to {found:?}, expected {expected:?}")]
    IdentityMismatch {
        expected: String,
        found: String,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

impl From<PersistenceError> for StateStoreError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::IoError(io) => StateStoreError::Io(io),
            other => StateStoreError::Corrupt(other.to_string()),
        }
    }
}
