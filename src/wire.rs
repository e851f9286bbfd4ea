//! Request/response shapes exchanged with the transport.
//!
//! Every request carries `prove_since_tx`, the currently trusted tx id, so the
//! server has to produce a proof chain rooted at the client's anchor.

use serde::{Deserialize, Serialize};

use crate::types::{Digest, DualProof, InclusionProof, TxMetadata};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub entries: Vec<KeyValue>,
    pub prove_since_tx: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRequest {
    pub reference_key: Vec<u8>,
    pub referenced_key: Vec<u8>,
    /// 0 resolves to the latest value of `referenced_key`.
    pub at_tx: u64,
    pub prove_since_tx: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub key: Vec<u8>,
    pub at_tx: Option<u64>,
    pub since_tx: Option<u64>,
    pub prove_since_tx: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    pub id: u64,
    pub entries_count: u32,
    pub metadata: TxMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub tx: TxHeader,
    /// One proof per submitted entry, in submission order.
    pub inclusion_proofs: Vec<InclusionProof>,
    pub dual_proof: DualProof,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedBy {
    /// Transaction holding the reference entry.
    pub tx: u64,
    pub key: Vec<u8>,
    pub at_tx: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadEntry {
    pub tx: u64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub referenced_by: Option<ReferencedBy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub entry: ReadEntry,
    pub inclusion_proof: InclusionProof,
    pub dual_proof: DualProof,
    pub signature: Vec<u8>,
}

/// Unverified head of the ledger, used only for trust-on-first-use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    pub tx_id: u64,
    pub tx_hash: Digest,
    pub signature: Vec<u8>,
}

/// Sent back to the server after a verification failure. `root` and
/// `signature` are those of the client's trust anchor at report time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TamperReport {
    pub key: Vec<u8>,
    pub tx_id: u64,
    pub root: Digest,
    pub signature: Vec<u8>,
}
