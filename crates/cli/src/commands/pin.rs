use anyhow::Context;
use ledger_trust::{Digest, TrustAnchor};
use std::path::Path;

/// Pins a known-good anchor obtained out of band. An existing anchor is
/// only replaced by one at the same or a later transaction.
pub fn run(
    dir: &Path,
    identity: &str,
    tx_id: u64,
    tx_hash: &str,
    signature: Option<&str>,
) -> anyhow::Result<TrustAnchor> {
    let tx_hash = parse_digest(tx_hash)?;
    let signature = match signature {
        Some(s) => hex::decode(s).context("signature is not valid hex")?,
        None => Vec::new(),
    };

    let store = ledger_trust_persistence::FileStateStore::open(dir)?;
    if let Some(current) = store.load(identity)? {
        if current.tx_id > tx_id {
            anyhow::bail!(
                "{} is anchored at tx {}, refusing to pin older tx {}",
                identity,
                current.tx_id,
                tx_id
            );
        }
    }

    let anchor = TrustAnchor::new(identity, tx_id, tx_hash, signature);
    store.store(&anchor)?;
    println!("📌 Pinned {} at tx {}", identity, tx_id);
    Ok(anchor)
}

fn parse_digest(raw: &str) -> anyhow::Result<Digest> {
    let bytes = hex::decode(raw.trim()).context("tx hash is not valid hex")?;
    Digest::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("tx hash must be 32 bytes, got {}", bytes.len()))
}
