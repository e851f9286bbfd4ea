// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! File-backed trust state store.
//!
//! One record file per server identity inside a state directory. A write
//! lands in `<name>.tmp`, is synced, the current record is copied to
//! `<name>.prev`, and the tmp file is renamed over the live one. At every
//! point of that sequence the live file holds either the old or the new
//! record, never a mix.

use crate::error::{PersistenceError, Result};
use crate::record;
use ledger_trust::{StateStoreError, TrustAnchor, TrustStateStore};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const EXTENSION: &str = "anchor";

/// Writers of one identity share its `.tmp` file; identities never wait
/// on each other.
#[derive(Debug, Default)]
struct WriteLocks(Mutex<HashMap<String, Arc<Mutex<()>>>>);

impl WriteLocks {
    fn for_identity(&self, server_identity: &str) -> Arc<Mutex<()>> {
        let mut table = self.0.lock().unwrap_or_else(|p| p.into_inner());
        table
            .entry(server_identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[derive(Debug)]
pub struct FileStateStore {
    dir: PathBuf,
    write_locks: WriteLocks,
}

impl FileStateStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_locks: WriteLocks::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Identities are hashed so any string maps to a safe file name.
    pub fn path_for(&self, server_identity: &str) -> PathBuf {
        let name = hex::encode(blake3::hash(server_identity.as_bytes()).as_bytes());
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    pub fn load(&self, server_identity: &str) -> Result<Option<TrustAnchor>> {
        let path = self.path_for(server_identity);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let anchor = record::decode(&bytes)?;
        if anchor.server_identity != server_identity {
            return Err(PersistenceError::IdentityMismatch {
                expected: server_identity.to_string(),
                found: anchor.server_identity,
            });
        }
        Ok(Some(anchor))
    }

    pub fn store(&self, anchor: &TrustAnchor) -> Result<()> {
        let bytes = record::encode(anchor)?;
        let path = self.path_for(&anchor.server_identity);
        let tmp_path = path.with_extension("tmp");
        let prev_path = path.with_extension("prev");

        let lock = self.write_locks.for_identity(&anchor.server_identity);
        let _guard = lock
            .lock()
            .map_err(|_| PersistenceError::InvalidFormat("store lock poisoned".into()))?;

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        // Keep one previous version for forensics.
        if path.exists() {
            if let Err(e) = fs::copy(&path, &prev_path) {
                tracing::warn!("Could not keep previous anchor at {:?}: {}", prev_path, e);
            }
        }

        fs::rename(&tmp_path, &path)?;
        sync_dir(&self.dir)?;

        tracing::debug!(
            server = %anchor.server_identity,
            tx_id = anchor.tx_id,
            "Trust anchor persisted to {:?}",
            path
        );
        Ok(())
    }

    pub fn delete(&self, server_identity: &str) -> Result<bool> {
        let path = self.path_for(server_identity);
        let lock = self.write_locks.for_identity(server_identity);
        let _guard = lock
            .lock()
            .map_err(|_| PersistenceError::InvalidFormat("store lock poisoned".into()))?;

        match fs::remove_file(&path) {
            Ok(()) => {
                sync_dir(&self.dir)?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Every readable anchor in the directory, sorted by identity.
    /// Unreadable records are reported, not skipped.
    pub fn list(&self) -> Result<Vec<Result<TrustAnchor>>> {
        let mut out = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            out.push(fs::read(&path).map_err(PersistenceError::from).and_then(|b| record::decode(&b)));
        }
        out.sort_by(|a, b| match (a, b) {
            (Ok(a), Ok(b)) => a.server_identity.cmp(&b.server_identity),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });
        Ok(out)
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

impl TrustStateStore for FileStateStore {
    fn get(&self, server_identity: &str) -> std::result::Result<Option<TrustAnchor>, StateStoreError> {
        Ok(self.load(server_identity)?)
    }

    fn set(&self, anchor: TrustAnchor) -> std::result::Result<(), StateStoreError> {
        Ok(self.store(&anchor)?)
    }

    fn remove(&self, server_identity: &str) -> std::result::Result<bool, StateStoreError> {
        Ok(self.delete(server_identity)?)
    }
}
