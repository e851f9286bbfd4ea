use std::path::Path;

/// Fails when any record in the directory is unreadable.
pub fn run(dir: &Path) -> anyhow::Result<()> {
    let store = super::open(dir)?;
    let records = store.list()?;
    let corrupt: Vec<String> = records
        .iter()
        .filter_map(|r| r.as_ref().err().map(|e| e.to_string()))
        .collect();

    if corrupt.is_empty() {
        println!("\n✅ VERIFIED\n");
        println!("Records:    {}", records.len());
        println!("Confidence: CRC64 per record\n");
        Ok(())
    } else {
        println!("\n❌ CORRUPTED\n");
        for e in &corrupt {
            println!("  {}", e);
        }
        anyhow::bail!("{} of {} records are corrupt", corrupt.len(), records.len())
    }
}
