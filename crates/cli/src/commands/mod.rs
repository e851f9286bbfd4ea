pub mod forget;
pub mod inspect;
pub mod pin;
pub mod show;
pub mod verify;

use ledger_trust_persistence::FileStateStore;
use std::path::Path;

pub(crate) fn open(dir: &Path) -> anyhow::Result<FileStateStore> {
    if !dir.is_dir() {
        anyhow::bail!("state directory {:?} does not exist", dir);
    }
    Ok(FileStateStore::open(dir)?)
}
