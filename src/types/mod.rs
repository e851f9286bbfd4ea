//! Data model shared by the verifier, the stores and the client.

pub mod anchor;
pub mod entry;
pub mod tx;

pub use anchor::TrustAnchor;
pub use entry::{Entry, VerifiedEntry};
pub use tx::{DualProof, InclusionProof, ProofStep, Side, TxMetadata, VerifiedTx};

/// 32-byte digest (tree roots, accumulated linear hashes).
pub type Digest = [u8; 32];

pub const ZERO_DIGEST: Digest = [0u8; 32];
