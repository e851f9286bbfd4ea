use std::sync::Arc;

use crate::state::{MemoryStateStore, TrustStateStore};
use crate::types::TrustAnchor;

#[test]
fn test_cold_store_is_empty() {
    let store = MemoryStateStore::new();
    assert!(store.get("a:1").unwrap().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_set_replaces_whole_anchor() {
    let store = MemoryStateStore::new();
    store.set(TrustAnchor::new("a:1", 1, [1; 32], vec![1])).unwrap();
    store.set(TrustAnchor::new("a:1", 2, [2; 32], vec![2, 2])).unwrap();

    let anchor = store.get("a:1").unwrap().unwrap();
    assert_eq!(anchor, TrustAnchor::new("a:1", 2, [2; 32], vec![2, 2]));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_identities_are_independent() {
    let store: Arc<dyn TrustStateStore> = Arc::new(MemoryStateStore::new());
    store.set(TrustAnchor::new("a:1", 3, [3; 32], Vec::new())).unwrap();
    store.set(TrustAnchor::new("b:1", 9, [9; 32], Vec::new())).unwrap();

    assert_eq!(store.get("a:1").unwrap().unwrap().tx_id, 3);
    assert_eq!(store.get("b:1").unwrap().unwrap().tx_id, 9);

    assert!(store.remove("a:1").unwrap());
    assert!(!store.remove("a:1").unwrap());
    assert!(store.get("a:1").unwrap().is_none());
    assert_eq!(store.get("b:1").unwrap().unwrap().tx_id, 9);
}

#[test]
fn test_genesis_anchor() {
    let genesis = TrustAnchor::genesis("a:1");
    assert!(genesis.is_genesis());

    let later = TrustAnchor::new("a:1", 1, [0; 32], Vec::new());
    assert!(later.is_newer_than(&genesis));
    assert!(!genesis.is_newer_than(&later));
}
