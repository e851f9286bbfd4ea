// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transaction metadata and proof containers.
//!
//! These are the shapes the server sends back. The verifier never trusts an
//! accumulated hash from the wire: it is always recomputed from
//! [`TxMetadata`] through the injected primitives.

use serde::{Deserialize, Serialize};

use super::Digest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMetadata {
    pub id: u64,
    /// ALH of transaction `id - 1` (all zero for the first transaction).
    pub prev_alh: Digest,
    pub entries_count: u32,
    /// Root of the entry hash tree of this transaction.
    pub eh_root: Digest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One sibling on the path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Digest,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub leaf_index: u32,
    /// Number of leaves in the tree.
    pub width: u32,
    pub terms: Vec<ProofStep>,
}

/// Proof that the ALH of `target_tx_metadata` is derivable from the ALH of
/// `source_tx_metadata` (source id <= target id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualProof {
    pub source_tx_metadata: TxMetadata,
    pub target_tx_metadata: TxMetadata,
    /// One term per transaction in `source+1..=target`.
    pub linear_terms: Vec<Digest>,
}

impl DualProof {
    /// Metadata of the transaction the server vouches for, seen from an
    /// anchor at `anchor_tx`. A newer tx is the target, an older one the
    /// source.
    pub fn claimed_metadata(&self, anchor_tx: u64, tx_id: u64) -> &TxMetadata {
        if anchor_tx <= tx_id {
            &self.target_tx_metadata
        } else {
            &self.source_tx_metadata
        }
    }
}

/// Result of a verified write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTx {
    pub id: u64,
    pub entries_count: u32,
    pub alh: Digest,
}
