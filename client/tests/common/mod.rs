// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::sync::Arc;

use ledger_trust::fixtures::{Blake3Primitives, MemoryLedger};
use ledger_trust::MemoryStateStore;
use ledger_trust_client::{ClientConfig, LedgerClient, MemoryTransport};

pub const IDENTITY: &str = "ledger-test:3322";

pub type TestClient = LedgerClient<MemoryTransport, Blake3Primitives, Arc<MemoryStateStore>>;

pub fn config() -> ClientConfig {
    ClientConfig {
        server_identity: Some(IDENTITY.to_string()),
        ..ClientConfig::default()
    }
}

pub fn client_with(transport: MemoryTransport, store: Arc<MemoryStateStore>) -> TestClient {
    LedgerClient::new(config(), transport, Blake3Primitives, store)
}

/// Fresh ledger, cold store.
pub fn fresh() -> (TestClient, Arc<MemoryStateStore>) {
    let store = Arc::new(MemoryStateStore::new());
    let client = client_with(MemoryTransport::new(MemoryLedger::new()), store.clone());
    (client, store)
}

pub fn anchor_tx(client: &TestClient) -> Option<u64> {
    client.current_anchor().unwrap().map(|a| a.tx_id)
}
