// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use common::*;
use ledger_trust::fixtures::{Blake3Primitives, MemoryLedger};
use ledger_trust::{MemoryStateStore, TrustAnchor, TrustStateStore};
use ledger_trust_client::{ClientConfig, ClientError, LedgerClient, MemoryTransport};
use std::sync::Arc;

fn strict_config() -> ClientConfig {
    ClientConfig {
        trust_on_first_use: false,
        ..config()
    }
}

#[tokio::test]
async fn test_cold_store_without_tofu_requires_bootstrap() {
    let store = Arc::new(MemoryStateStore::new());
    let client = LedgerClient::new(
        strict_config(),
        MemoryTransport::new(MemoryLedger::new()),
        Blake3Primitives,
        store.clone(),
    );

    let err = client.verified_set("k", "v").await.unwrap_err();
    assert!(matches!(err, ClientError::BootstrapRequired(ref id) if id == IDENTITY));
    assert!(store.is_empty());
    assert_eq!(client.transport().ledger().lock().await.head(), 0);
}

#[tokio::test]
async fn test_bootstrap_adopts_server_state() {
    let (seed, _) = fresh();
    seed.verified_set("a", "1").await.unwrap();
    seed.verified_set("b", "2").await.unwrap();

    let store = Arc::new(MemoryStateStore::new());
    let client = LedgerClient::new(
        strict_config(),
        MemoryTransport::shared(seed.transport().ledger()),
        Blake3Primitives,
        store.clone(),
    );

    let anchor = client.bootstrap().await.unwrap();
    assert_eq!(anchor.tx_id, 2);
    assert_eq!(store.get(IDENTITY).unwrap(), Some(anchor.clone()));

    // From here on everything is checked against the adopted anchor.
    let tx = client.verified_set("c", "3").await.unwrap();
    assert_eq!(tx.id, 3);
    let got = client.verified_get_at("a", 1).await.unwrap();
    assert_eq!(got.value, b"1");

    // Bootstrapping again keeps the newer anchor.
    let again = client.bootstrap().await.unwrap();
    assert_eq!(again.tx_id, 3);
}

#[tokio::test]
async fn test_bootstrap_of_empty_ledger_stores_nothing() {
    let (client, store) = fresh();
    let anchor = client.bootstrap().await.unwrap();
    assert!(anchor.is_genesis());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_pinned_anchor_guards_first_contact() {
    let (seed, _) = fresh();
    seed.verified_set("k", "v").await.unwrap();
    let genuine = seed.current_anchor().unwrap().unwrap();

    // Server rewrites history before the new client ever talks to it.
    seed.transport()
        .ledger()
        .lock()
        .await
        .rewrite_tx(1, vec![ledger_trust::wire::KeyValue::new("k", "evil")])
        .unwrap();

    let client = LedgerClient::new(
        strict_config(),
        MemoryTransport::shared(seed.transport().ledger()),
        Blake3Primitives,
        Arc::new(MemoryStateStore::new()),
    );
    client.pin_anchor(genuine.clone()).await.unwrap();

    let err = client.verified_get("k").await.unwrap_err();
    assert!(err.is_tamper_evidence());
    assert_eq!(client.current_anchor().unwrap(), Some(genuine));
}

#[tokio::test]
async fn test_pin_refuses_regression() {
    let (client, _store) = fresh();
    client.verified_set("a", "1").await.unwrap();
    client.verified_set("b", "2").await.unwrap();

    let stale = TrustAnchor::new(IDENTITY, 1, [0u8; 32], vec![]);
    let err = client.pin_anchor(stale).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::AnchorRegression {
            current: 2,
            requested: 1,
            ..
        }
    ));
    assert_eq!(anchor_tx(&client), Some(2));
}

#[tokio::test]
async fn test_pin_refuses_foreign_identity() {
    let (client, store) = fresh();
    let foreign = TrustAnchor::new("elsewhere:1", 4, [1u8; 32], vec![]);
    let err = client.pin_anchor(foreign).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(store.is_empty());
}
