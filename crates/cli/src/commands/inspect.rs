use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

pub fn run(dir: &Path) -> anyhow::Result<()> {
    let store = super::open(dir)?;
    let records = store.list()?;

    println!("\nTrust State Report: {}", dir.display());
    println!("--------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Server", "Tx", "ALH", "Signature", "Updated"]);

    for record in &records {
        match record {
            Ok(anchor) => {
                let updated = std::fs::metadata(store.path_for(&anchor.server_identity))
                    .and_then(|m| m.modified())
                    .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339())
                    .unwrap_or_default();
                table.add_row(vec![
                    anchor.server_identity.clone(),
                    anchor.tx_id.to_string(),
                    hex::encode(anchor.tx_hash),
                    format!("{} bytes", anchor.signature.len()),
                    updated,
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    "CORRUPT".to_string(),
                    String::new(),
                    e.to_string(),
                    String::new(),
                    String::new(),
                ]);
            }
        }
    }

    if records.is_empty() {
        println!("No trust anchors. The next verified operation will trust on first use.");
    } else {
        println!("{table}");
    }
    Ok(())
}
