use serde::{Deserialize, Serialize};

/// Leaf object whose inclusion in a transaction is proved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    /// A direct key/value write.
    Plain { key: Vec<u8>, value: Vec<u8> },
    /// A pointer from `reference_key` to `referenced_key` as of `referenced_tx`.
    /// The proof covers the pointer, not the value it resolves to.
    Reference {
        reference_key: Vec<u8>,
        referenced_key: Vec<u8>,
        referenced_tx: u64,
    },
}

impl Entry {
    pub fn plain(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Entry::Plain {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn reference(
        reference_key: impl Into<Vec<u8>>,
        referenced_key: impl Into<Vec<u8>>,
        referenced_tx: u64,
    ) -> Self {
        Entry::Reference {
            reference_key: reference_key.into(),
            referenced_key: referenced_key.into(),
            referenced_tx,
        }
    }

    /// The key this leaf is stored under.
    pub fn key(&self) -> &[u8] {
        match self {
            Entry::Plain { key, .. } => key,
            Entry::Reference { reference_key, .. } => reference_key,
        }
    }
}

/// Result of a verified read. Only built once both proofs have passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEntry {
    /// The leaf that was proved.
    pub entry: Entry,
    /// Value returned to the caller. For a reference read this is the value
    /// the pointer resolved to on the server.
    pub value: Vec<u8>,
    /// Transaction the leaf was proved against.
    pub tx_id: u64,
}
