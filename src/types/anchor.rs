// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Trust anchor.

use serde::{Deserialize, Serialize};

use super::{Digest, ZERO_DIGEST};

/// The last transaction this client has cryptographically confirmed for one
/// server identity.
///
/// `tx_hash` is the accumulated linear hash (ALH) of transaction `tx_id`.
/// An anchor is only ever replaced as a whole; `tx_id` never moves backwards
/// for a given `server_identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAnchor {
    pub server_identity: String,
    pub tx_id: u64,
    pub tx_hash: Digest,
    /// Server signature over the anchored state, carried opaquely.
    pub signature: Vec<u8>,
}

impl TrustAnchor {
    pub fn new(
        server_identity: impl Into<String>,
        tx_id: u64,
        tx_hash: Digest,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            server_identity: server_identity.into(),
            tx_id,
            tx_hash,
            signature,
        }
    }

    /// Anchor of a client that trusts nothing yet. Verifying against it skips
    /// the consistency check (trust-on-first-use).
    pub fn genesis(server_identity: impl Into<String>) -> Self {
        Self::new(server_identity, 0, ZERO_DIGEST, Vec::new())
    }

    pub fn is_genesis(&self) -> bool {
        self.tx_id == 0
    }

    pub fn is_newer_than(&self, other: &TrustAnchor) -> bool {
        self.tx_id > other.tx_id
    }
}
