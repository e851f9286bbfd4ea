use anyhow::Context;
use std::path::Path;

pub fn run(dir: &Path, identity: &str, json: bool) -> anyhow::Result<()> {
    let store = super::open(dir)?;
    let anchor = store
        .load(identity)
        .with_context(|| format!("reading anchor for {}", identity))?
        .with_context(|| format!("no trust anchor for {}", identity))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&anchor)?);
        return Ok(());
    }

    println!("Server:    {}", anchor.server_identity);
    println!("Tx:        {}", anchor.tx_id);
    println!("ALH:       {}", hex::encode(anchor.tx_hash));
    println!("Signature: {}", hex::encode(&anchor.signature));
    println!("File:      {}", store.path_for(identity).display());
    Ok(())
}
