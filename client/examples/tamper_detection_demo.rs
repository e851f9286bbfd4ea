// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tamper Detection Demo
//!
//! Writes through a verified client backed by a durable trust store, lets
//! the server rewrite history, and shows the next read being refused.

use ledger_trust::fixtures::{Blake3Primitives, MemoryLedger};
use ledger_trust::wire::KeyValue;
use ledger_trust_client::{telemetry, ClientConfig, LedgerClient, MemoryTransport};
use ledger_trust_persistence::FileStateStore;
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    println!("\n╔════════════════════════════════════════╗");
    println!("║  Ledger Trust Tamper Detection Demo    ║");
    println!("╚════════════════════════════════════════╝\n");

    let dir = tempdir()?;
    let config = ClientConfig {
        server_identity: Some("demo-ledger".into()),
        state_dir: dir.path().to_path_buf(),
        ..ClientConfig::default()
    };

    let transport = MemoryTransport::new(MemoryLedger::new());
    let store = FileStateStore::open(&config.state_dir)?;
    let client = LedgerClient::new(config, transport.clone(), Blake3Primitives, store);

    // Phase 1: verified writes
    println!("📝 Phase 1: Verified writes");
    for (key, value) in [("alice", "100"), ("bob", "250"), ("alice", "75")] {
        let tx = client.verified_set(key, value).await?;
        println!("   {} = {} -> tx {} ({} entries)", key, value, tx.id, tx.entries_count);
    }
    if let Some(anchor) = client.current_anchor()? {
        println!("   Anchor: tx {} alh {}", anchor.tx_id, hex::encode(anchor.tx_hash));
    }

    // Phase 2: historical read
    println!("\n🔍 Phase 2: Verified historical read");
    let old = client.verified_get_at("alice", 1).await?;
    println!("   alice@tx1 = {}", String::from_utf8_lossy(&old.value));

    // Phase 3: the server rewrites tx 1
    println!("\n💥 Phase 3: Server rewrites history");
    transport
        .ledger()
        .lock()
        .await
        .rewrite_tx(1, vec![KeyValue::new("alice", "1000000")])?;

    match client.verified_get_at("alice", 1).await {
        Ok(entry) => println!("   ❌ Accepted forged value {:?}", entry.value),
        Err(e) if e.is_tamper_evidence() => println!("   ✅ Refused: {}", e),
        Err(e) => println!("   ⚠️  Failed: {}", e),
    }

    if let Some(anchor) = client.current_anchor()? {
        println!("   Anchor still at tx {}", anchor.tx_id);
    }
    println!();
    Ok(())
}
