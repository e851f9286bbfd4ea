// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! ledger-trust: client-side verification core for a tamper-evident,
//! append-only key-value ledger.
//!
//! The crate owns the pieces that decide whether a server answer can be
//! trusted: the entry codec, the proof verifier and the trust anchor store
//! contract. Hash-tree math is consumed through [`primitives::ProofPrimitives`].

pub mod error;
pub mod types;
pub mod codec;
pub mod primitives;
pub mod verify;
pub mod state;
pub mod wire;
pub mod fixtures;

pub use error::{CodecError, StateStoreError, VerificationFailure};
pub use primitives::ProofPrimitives;
pub use state::{MemoryStateStore, TrustStateStore};
pub use types::{
    Digest, DualProof, Entry, InclusionProof, ProofStep, Side, TrustAnchor, TxMetadata,
    VerifiedEntry, VerifiedTx,
};
pub use verify::ProofVerifier;

#[cfg(test)]
pub mod tests;
