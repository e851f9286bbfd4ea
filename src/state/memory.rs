use std::collections::HashMap;
use std::sync::RwLock;

use super::TrustStateStore;
use crate::error::StateStoreError;
use crate::types::TrustAnchor;

/// Process-local store. Anchors are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    anchors: RwLock<HashMap<String, TrustAnchor>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.anchors.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TrustStateStore for MemoryStateStore {
    fn get(&self, server_identity: &str) -> Result<Option<TrustAnchor>, StateStoreError> {
        let anchors = self.anchors.read().map_err(|_| StateStoreError::Poisoned)?;
        Ok(anchors.get(server_identity).cloned())
    }

    fn set(&self, anchor: TrustAnchor) -> Result<(), StateStoreError> {
        let mut anchors = self.anchors.write().map_err(|_| StateStoreError::Poisoned)?;
        anchors.insert(anchor.server_identity.clone(), anchor);
        Ok(())
    }

    fn remove(&self, server_identity: &str) -> Result<bool, StateStoreError> {
        let mut anchors = self.anchors.write().map_err(|_| StateStoreError::Poisoned)?;
        Ok(anchors.remove(server_identity).is_some())
    }
}
