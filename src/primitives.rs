//! Proof primitives capability.
//!
//! The Merkle math and the accumulated hash function live outside this crate.
//! The verifier only sees this trait, so ordering and anchor lifecycle can be
//! exercised against any implementation, including the deterministic one in
//! [`crate::fixtures`].

use crate::types::{Digest, DualProof, InclusionProof, TxMetadata};

pub trait ProofPrimitives: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> Digest;

    /// `leaf` is the encoded entry, not its hash.
    fn verify_inclusion(&self, leaf: &[u8], proof: &InclusionProof, root: &Digest) -> bool;

    /// Must only accept `source_tx <= target_tx`.
    fn verify_consistency(
        &self,
        proof: &DualProof,
        source_tx: u64,
        target_tx: u64,
        source_alh: &Digest,
        target_alh: &Digest,
    ) -> bool;

    /// Hash binding a transaction's entry count and entry hash tree root.
    fn tx_inner_hash(&self, meta: &TxMetadata) -> Digest {
        let mut buf = Vec::with_capacity(4 + 32);
        buf.extend_from_slice(&meta.entries_count.to_le_bytes());
        buf.extend_from_slice(&meta.eh_root);
        self.digest(&buf)
    }

    /// Accumulated linear hash: `digest(id LE | prev_alh | inner_hash)`.
    fn tx_alh(&self, meta: &TxMetadata) -> Digest {
        let inner = self.tx_inner_hash(meta);
        let mut buf = Vec::with_capacity(8 + 32 + 32);
        buf.extend_from_slice(&meta.id.to_le_bytes());
        buf.extend_from_slice(&meta.prev_alh);
        buf.extend_from_slice(&inner);
        self.digest(&buf)
    }
}
