// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-memory proving ledger.
//!
//! Plays the server side of the verified protocol: every write becomes one
//! transaction, every answer carries an inclusion proof and a dual proof
//! rooted at the caller's `prove_since_tx`. It also exposes the knobs needed
//! to fake a misbehaving server (history rewrites).

use thiserror::Error;

use super::merkle::{self, Blake3Primitives};
use crate::codec;
use crate::primitives::ProofPrimitives;
use crate::types::{Digest, DualProof, Entry, TxMetadata, ZERO_DIGEST};
use crate::wire::{
    KeyValue, ReadEntry, ReadRequest, ReadResponse, ReferenceRequest, ReferencedBy, ServerState,
    TamperReport, TxHeader, WriteRequest, WriteResponse,
};

/// Key of the bookkeeping entry appended to every write transaction.
pub const BOOKKEEPING_KEY: &[u8] = b"\xffledger.tx";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("key not found")]
    KeyNotFound,
    #[error("tx {0} does not exist")]
    UnknownTx(u64),
    #[error("empty write")]
    EmptyWrite,
    #[error("entry could not be encoded: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone)]
struct StoredTx {
    meta: TxMetadata,
    entries: Vec<Entry>,
    leaf_hashes: Vec<Digest>,
}

#[derive(Debug, Clone)]
pub struct MemoryLedger {
    primitives: Blake3Primitives,
    txs: Vec<StoredTx>,
    bookkeeping_entries: u32,
    tamper_reports: Vec<TamperReport>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_bookkeeping_entries(1)
    }

    pub fn with_bookkeeping_entries(bookkeeping_entries: u32) -> Self {
        Self {
            primitives: Blake3Primitives,
            txs: Vec::new(),
            bookkeeping_entries,
            tamper_reports: Vec::new(),
        }
    }

    pub fn head(&self) -> u64 {
        self.txs.len() as u64
    }

    pub fn alh(&self, tx_id: u64) -> Result<Digest, LedgerError> {
        Ok(self.primitives.tx_alh(&self.tx(tx_id)?.meta))
    }

    pub fn state(&self) -> ServerState {
        let tx_id = self.head();
        let tx_hash = self.alh(tx_id).unwrap_or(ZERO_DIGEST);
        ServerState {
            tx_id,
            tx_hash,
            signature: self.sign(&tx_hash),
        }
    }

    pub fn write(&mut self, request: &WriteRequest) -> Result<WriteResponse, LedgerError> {
        if request.entries.is_empty() {
            return Err(LedgerError::EmptyWrite);
        }
        let entries = request
            .entries
            .iter()
            .map(|KeyValue { key, value }| Entry::plain(key.clone(), value.clone()))
            .collect();
        self.commit(entries, request.entries.len(), request.prove_since_tx)
    }

    pub fn set_reference(&mut self, request: &ReferenceRequest) -> Result<WriteResponse, LedgerError> {
        self.latest_plain(&request.referenced_key, request.at_tx)?;
        let entry = Entry::reference(
            request.reference_key.clone(),
            request.referenced_key.clone(),
            request.at_tx,
        );
        self.commit(vec![entry], 1, request.prove_since_tx)
    }

    pub fn read(&self, request: &ReadRequest) -> Result<ReadResponse, LedgerError> {
        if let Some(since) = request.since_tx {
            if since > self.head() {
                return Err(LedgerError::UnknownTx(since));
            }
        }

        let (tx_id, index) = self.locate(&request.key, request.at_tx)?;
        let stored = self.tx(tx_id)?;

        let entry = match &stored.entries[index] {
            Entry::Plain { key, value } => ReadEntry {
                tx: tx_id,
                key: key.clone(),
                value: value.clone(),
                referenced_by: None,
            },
            Entry::Reference {
                reference_key,
                referenced_key,
                referenced_tx,
            } => {
                let (value_tx, value) = self.latest_plain(referenced_key, *referenced_tx)?;
                ReadEntry {
                    tx: value_tx,
                    key: referenced_key.clone(),
                    value,
                    referenced_by: Some(ReferencedBy {
                        tx: tx_id,
                        key: reference_key.clone(),
                        at_tx: *referenced_tx,
                    }),
                }
            }
        };

        let inclusion_proof = merkle::inclusion_proof(&stored.leaf_hashes, index)
            .ok_or(LedgerError::UnknownTx(tx_id))?;
        let dual_proof = self.dual_proof(tx_id, request.prove_since_tx)?;
        let signature = self.sign(&self.alh(tx_id.max(request.prove_since_tx))?);

        Ok(ReadResponse {
            entry,
            inclusion_proof,
            dual_proof,
            signature,
        })
    }

    pub fn report_tamper(&mut self, report: TamperReport) {
        self.tamper_reports.push(report);
    }

    /// Reports received so far, oldest first.
    pub fn tamper_reports(&self) -> &[TamperReport] {
        &self.tamper_reports
    }

    /// Replaces the entries of an already committed transaction and rebuilds
    /// every later accumulated hash, as a server rewriting history would.
    pub fn rewrite_tx(&mut self, tx_id: u64, entries: Vec<KeyValue>) -> Result<(), LedgerError> {
        self.tx(tx_id)?;
        let idx = (tx_id - 1) as usize;

        let mut rewritten: Vec<Entry> = entries
            .into_iter()
            .map(|kv| Entry::plain(kv.key, kv.value))
            .collect();
        rewritten.extend(self.bookkeeping(tx_id));
        let leaf_hashes = hash_leaves(&rewritten)?;
        let stored = &mut self.txs[idx];
        stored.meta.eh_root = merkle::tree_root(&leaf_hashes);
        stored.meta.entries_count = rewritten.len() as u32;
        stored.entries = rewritten;
        stored.leaf_hashes = leaf_hashes;

        for i in idx + 1..self.txs.len() {
            let prev_alh = self.primitives.tx_alh(&self.txs[i - 1].meta);
            self.txs[i].meta.prev_alh = prev_alh;
        }
        Ok(())
    }

    fn commit(
        &mut self,
        mut entries: Vec<Entry>,
        proved: usize,
        prove_since_tx: u64,
    ) -> Result<WriteResponse, LedgerError> {
        let id = self.head() + 1;
        entries.extend(self.bookkeeping(id));

        let leaf_hashes = hash_leaves(&entries)?;
        let prev_alh = self.alh(id - 1).unwrap_or(ZERO_DIGEST);
        let meta = TxMetadata {
            id,
            prev_alh,
            entries_count: entries.len() as u32,
            eh_root: merkle::tree_root(&leaf_hashes),
        };

        let inclusion_proofs = (0..proved)
            .filter_map(|i| merkle::inclusion_proof(&leaf_hashes, i))
            .collect();

        self.txs.push(StoredTx {
            meta: meta.clone(),
            entries,
            leaf_hashes,
        });

        let dual_proof = self.dual_proof(id, prove_since_tx)?;
        let signature = self.sign(&self.alh(id)?);

        Ok(WriteResponse {
            tx: TxHeader {
                id,
                entries_count: meta.entries_count,
                metadata: meta,
            },
            inclusion_proofs,
            dual_proof,
            signature,
        })
    }

    fn bookkeeping(&self, tx_id: u64) -> Vec<Entry> {
        (0..self.bookkeeping_entries)
            .map(|n| {
                let mut value = tx_id.to_le_bytes().to_vec();
                value.extend_from_slice(&n.to_le_bytes());
                Entry::plain(BOOKKEEPING_KEY.to_vec(), value)
            })
            .collect()
    }

    /// Dual proof between `a` and `b`, ordered by ascending tx id.
    fn dual_proof(&self, a: u64, b: u64) -> Result<DualProof, LedgerError> {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        let linear_terms = (source + 1..=target)
            .map(|id| -> Result<Digest, LedgerError> {
                Ok(self.primitives.tx_inner_hash(&self.tx(id)?.meta))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DualProof {
            source_tx_metadata: self.metadata(source)?,
            target_tx_metadata: self.metadata(target)?,
            linear_terms,
        })
    }

    fn metadata(&self, tx_id: u64) -> Result<TxMetadata, LedgerError> {
        if tx_id == 0 {
            return Ok(TxMetadata {
                id: 0,
                prev_alh: ZERO_DIGEST,
                entries_count: 0,
                eh_root: ZERO_DIGEST,
            });
        }
        Ok(self.tx(tx_id)?.meta.clone())
    }

    fn tx(&self, tx_id: u64) -> Result<&StoredTx, LedgerError> {
        if tx_id == 0 {
            return Err(LedgerError::UnknownTx(0));
        }
        self.txs
            .get((tx_id - 1) as usize)
            .ok_or(LedgerError::UnknownTx(tx_id))
    }

    /// Newest (tx, index) whose leaf is stored under `key`, at or before `at_tx`
    /// (exactly at `at_tx` when given).
    fn locate(&self, key: &[u8], at_tx: Option<u64>) -> Result<(u64, usize), LedgerError> {
        if let Some(at) = at_tx {
            let stored = self.tx(at)?;
            return stored
                .entries
                .iter()
                .rposition(|e| e.key() == key)
                .map(|i| (at, i))
                .ok_or(LedgerError::KeyNotFound);
        }

        self.txs
            .iter()
            .rev()
            .find_map(|stored| {
                stored
                    .entries
                    .iter()
                    .rposition(|e| e.key() == key)
                    .map(|i| (stored.meta.id, i))
            })
            .ok_or(LedgerError::KeyNotFound)
    }

    /// Latest plain value of `key` as of `at_tx` (0 = head).
    fn latest_plain(&self, key: &[u8], at_tx: u64) -> Result<(u64, Vec<u8>), LedgerError> {
        let upto = if at_tx == 0 { self.head() } else { at_tx };
        self.txs
            .iter()
            .take(upto as usize)
            .rev()
            .find_map(|stored| {
                stored.entries.iter().rev().find_map(|e| match e {
                    Entry::Plain { key: k, value } if k.as_slice() == key => {
                        Some((stored.meta.id, value.clone()))
                    }
                    _ => None,
                })
            })
            .ok_or(LedgerError::KeyNotFound)
    }

    fn sign(&self, alh: &Digest) -> Vec<u8> {
        self.primitives.digest(alh).to_vec()
    }
}

fn hash_leaves(entries: &[Entry]) -> Result<Vec<Digest>, LedgerError> {
    entries
        .iter()
        .map(|e| {
            codec::encode_leaf(e)
                .map(|leaf| merkle::leaf_hash(&leaf))
                .map_err(|err| LedgerError::Encoding(err.to_string()))
        })
        .collect()
}
