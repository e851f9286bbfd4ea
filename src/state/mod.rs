//! Trust State Store contract.
//!
//! The store is the only durable mutable state of the module: one
//! [`TrustAnchor`] per server identity. Serializing the read-verify-write
//! sequence per identity is the caller's job (see the client's identity
//! locks); the store only has to make each `set` a single atomic replace.

pub mod memory;

pub use memory::MemoryStateStore;

use crate::error::StateStoreError;
use crate::types::TrustAnchor;

pub trait TrustStateStore: Send + Sync {
    /// `Ok(None)` means nothing is trusted yet for this identity.
    fn get(&self, server_identity: &str) -> Result<Option<TrustAnchor>, StateStoreError>;

    /// Replaces the anchor for `anchor.server_identity`. When this returns
    /// `Ok` the new anchor is durable; on `Err` the previous one still is.
    fn set(&self, anchor: TrustAnchor) -> Result<(), StateStoreError>;

    /// Forgets the anchor. Returns whether one existed.
    fn remove(&self, server_identity: &str) -> Result<bool, StateStoreError>;
}

impl<S: TrustStateStore + ?Sized> TrustStateStore for std::sync::Arc<S> {
    fn get(&self, server_identity: &str) -> Result<Option<TrustAnchor>, StateStoreError> {
        (**self).get(server_identity)
    }

    fn set(&self, anchor: TrustAnchor) -> Result<(), StateStoreError> {
        (**self).set(anchor)
    }

    fn remove(&self, server_identity: &str) -> Result<bool, StateStoreError> {
        (**self).remove(server_identity)
    }
}
