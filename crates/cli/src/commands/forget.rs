use std::path::Path;

pub fn run(dir: &Path, identity: &str) -> anyhow::Result<bool> {
    let store = super::open(dir)?;
    let removed = store.delete(identity)?;
    if removed {
        println!("🗑️  Forgot trust anchor for {}", identity);
        println!("   The next verified operation will trust on first use.");
    } else {
        println!("No trust anchor for {}", identity);
    }
    Ok(removed)
}
