use ledger_trust::TrustAnchor;
use ledger_trust_cli::commands::{forget, inspect, pin, show, verify};
use ledger_trust_persistence::FileStateStore;
use tempfile::tempdir;

const IDENTITY: &str = "ledger.internal:3322";

fn seeded(dir: &std::path::Path) -> FileStateStore {
    let store = FileStateStore::open(dir).unwrap();
    store
        .store(&TrustAnchor::new(IDENTITY, 7, [0x11; 32], vec![1, 2, 3]))
        .unwrap();
    store
        .store(&TrustAnchor::new("other:1", 2, [0x22; 32], vec![]))
        .unwrap();
    store
}

#[test]
fn test_inspect_show_verify() {
    let dir = tempdir().unwrap();
    seeded(dir.path());

    assert!(inspect::run(dir.path()).is_ok());
    assert!(verify::run(dir.path()).is_ok());
    assert!(show::run(dir.path(), IDENTITY, false).is_ok());
    assert!(show::run(dir.path(), IDENTITY, true).is_ok());
    assert!(show::run(dir.path(), "unknown:1", false).is_err());
}

#[test]
fn test_verify_reports_corruption() {
    let dir = tempdir().unwrap();
    let store = seeded(dir.path());

    let path = store.path_for(IDENTITY);
    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&path, bytes).unwrap();

    assert!(verify::run(dir.path()).is_err());
    // Inspect still lists what it can.
    assert!(inspect::run(dir.path()).is_ok());
}

#[test]
fn test_pin_and_forget() {
    let dir = tempdir().unwrap();
    let hash = hex::encode([0xAB; 32]);

    let pinned = pin::run(dir.path(), IDENTITY, 5, &hash, Some("cafe")).unwrap();
    assert_eq!(pinned.signature, vec![0xCA, 0xFE]);

    let store = FileStateStore::open(dir.path()).unwrap();
    assert_eq!(store.load(IDENTITY).unwrap(), Some(pinned));

    // Older tx is refused, newer accepted.
    assert!(pin::run(dir.path(), IDENTITY, 4, &hash, None).is_err());
    assert_eq!(pin::run(dir.path(), IDENTITY, 9, &hash, None).unwrap().tx_id, 9);

    assert!(forget::run(dir.path(), IDENTITY).unwrap());
    assert!(!forget::run(dir.path(), IDENTITY).unwrap());
    assert_eq!(store.load(IDENTITY).unwrap(), None);
}

#[test]
fn test_pin_rejects_bad_hash() {
    let dir = tempdir().unwrap();
    assert!(pin::run(dir.path(), IDENTITY, 1, "zz", None).is_err());
    assert!(pin::run(dir.path(), IDENTITY, 1, &hex::encode([1u8; 16]), None).is_err());
}

#[test]
fn test_missing_state_dir() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(inspect::run(&missing).is_err());
}
