// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Verified operation orchestrator.
//!
//! Every operation runs load-anchor, request, verify, store-anchor under the
//! lock of its server identity. A result is only handed back once the anchor
//! it was verified against is durable; any failure leaves the stored anchor
//! exactly as it was.

use std::future::Future;

use ledger_trust::wire::{
    KeyValue, ReadRequest, ReadResponse, ReferenceRequest, TamperReport, WriteRequest, WriteResponse,
};
use ledger_trust::{
    Entry, ProofPrimitives, ProofVerifier, TrustAnchor, TrustStateStore, VerificationFailure,
    VerifiedEntry, VerifiedTx,
};
use ledger_trust_persistence::FileStateStore;

use crate::config::ClientConfig;
use crate::errors::{ClientError, TransportFailure};
use crate::locks::IdentityLocks;
use crate::network::{HttpTransport, LedgerTransport};
use crate::operation::{Operation, OperationState};
use crate::telemetry;

pub struct LedgerClient<T, P, S> {
    identity: String,
    config: ClientConfig,
    transport: T,
    verifier: ProofVerifier<P>,
    store: S,
    locks: IdentityLocks,
}

pub type HttpLedgerClient<P> = LedgerClient<HttpTransport, P, FileStateStore>;

impl<P: ProofPrimitives> LedgerClient<HttpTransport, P, FileStateStore> {
    /// HTTP transport and file-backed trust state, both taken from `config`.
    pub fn open(config: ClientConfig, primitives: P) -> Result<Self, ClientError> {
        let store = FileStateStore::open(&config.state_dir)
            .map_err(ledger_trust::StateStoreError::from)?;
        let transport = HttpTransport::from_config(&config);
        Ok(Self::new(config, transport, primitives, store))
    }
}

impl<T, P, S> LedgerClient<T, P, S>
where
    T: LedgerTransport,
    P: ProofPrimitives,
    S: TrustStateStore,
{
    pub fn new(config: ClientConfig, transport: T, primitives: P, store: S) -> Self {
        Self {
            identity: config.server_identity(),
            config,
            transport,
            verifier: ProofVerifier::new(primitives),
            store,
            locks: IdentityLocks::new(),
        }
    }

    /// Share identity locks with other clients writing to the same store.
    pub fn with_locks(mut self, locks: IdentityLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn server_identity(&self) -> &str {
        &self.identity
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_anchor(&self) -> Result<Option<TrustAnchor>, ClientError> {
        Ok(self.store.get(&self.identity)?)
    }

    pub async fn verified_set(
        &self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Result<VerifiedTx, ClientError> {
        self.verified_set_all(vec![KeyValue::new(key, value)]).await
    }

    /// Writes all entries in one transaction and proves each of them.
    pub async fn verified_set_all(&self, entries: Vec<KeyValue>) -> Result<VerifiedTx, ClientError> {
        let _guard = self.locks.acquire(&self.identity).await;
        let mut op = Operation::start("verified_set", &self.identity);

        if entries.is_empty() {
            return Err(op.reject(ClientError::InvalidRequest("no entries to write".into())));
        }

        let anchor = self.load_anchor(&mut op)?;
        let proved: Vec<Entry> = entries
            .iter()
            .map(|kv| Entry::plain(kv.key.clone(), kv.value.clone()))
            .collect();
        let request = WriteRequest {
            entries,
            prove_since_tx: anchor.tx_id,
        };

        let resp = self.send(&mut op, self.transport.write(request)).await?;
        self.commit_write(&mut op, &anchor, &proved, resp)
    }

    /// Stores a pointer from `reference_key` to `referenced_key` as of
    /// `at_tx` (0 follows the latest value). The proof covers the pointer.
    pub async fn verified_set_reference(
        &self,
        reference_key: impl Into<Vec<u8>>,
        referenced_key: impl Into<Vec<u8>>,
        at_tx: u64,
    ) -> Result<VerifiedTx, ClientError> {
        let _guard = self.locks.acquire(&self.identity).await;
        let mut op = Operation::start("verified_set_reference", &self.identity);

        let anchor = self.load_anchor(&mut op)?;
        let reference_key = reference_key.into();
        let referenced_key = referenced_key.into();
        let proved = [Entry::reference(
            reference_key.clone(),
            referenced_key.clone(),
            at_tx,
        )];
        let request = ReferenceRequest {
            reference_key,
            referenced_key,
            at_tx,
            prove_since_tx: anchor.tx_id,
        };

        let resp = self.send(&mut op, self.transport.set_reference(request)).await?;
        self.commit_write(&mut op, &anchor, &proved, resp)
    }

    pub async fn verified_get(&self, key: impl Into<Vec<u8>>) -> Result<VerifiedEntry, ClientError> {
        self.read("verified_get", key.into(), None, None).await
    }

    /// Value of `key` as written in transaction `tx_id`.
    pub async fn verified_get_at(
        &self,
        key: impl Into<Vec<u8>>,
        tx_id: u64,
    ) -> Result<VerifiedEntry, ClientError> {
        self.read("verified_get_at", key.into(), Some(tx_id), None).await
    }

    /// Latest value of `key` once the server has reached transaction `tx_id`.
    pub async fn verified_get_since(
        &self,
        key: impl Into<Vec<u8>>,
        tx_id: u64,
    ) -> Result<VerifiedEntry, ClientError> {
        self.read("verified_get_since", key.into(), None, Some(tx_id)).await
    }

    /// Explicit trust-on-first-use: adopts the server's current state,
    /// unverified, when nothing is trusted yet. An existing anchor is
    /// returned untouched.
    pub async fn bootstrap(&self) -> Result<TrustAnchor, ClientError> {
        let _guard = self.locks.acquire(&self.identity).await;

        if let Some(existing) = self.store.get(&self.identity)? {
            tracing::debug!(server = %self.identity, tx_id = existing.tx_id, "Already anchored");
            return Ok(existing);
        }

        let state = self.timed(self.transport.current_state()).await?;
        let anchor = TrustAnchor::new(self.identity.clone(), state.tx_id, state.tx_hash, state.signature);

        tracing::warn!(
            server = %self.identity,
            tx_id = anchor.tx_id,
            "Trusting unverified server state (trust-on-first-use)"
        );

        if !anchor.is_genesis() {
            self.store.set(anchor.clone())?;
            telemetry::record_anchor(&self.identity, anchor.tx_id);
        }
        Ok(anchor)
    }

    /// Installs a known-good anchor obtained out of band. Refuses to move an
    /// existing anchor backwards.
    pub async fn pin_anchor(&self, anchor: TrustAnchor) -> Result<(), ClientError> {
        if anchor.server_identity != self.identity {
            return Err(ClientError::InvalidRequest(format!(
                "anchor belongs to {}, client talks to {}",
                anchor.server_identity, self.identity
            )));
        }

        let _guard = self.locks.acquire(&self.identity).await;

        if let Some(current) = self.store.get(&self.identity)? {
            if current.is_newer_than(&anchor) {
                return Err(ClientError::AnchorRegression {
                    identity: self.identity.clone(),
                    current: current.tx_id,
                    requested: anchor.tx_id,
                });
            }
        }

        let tx_id = anchor.tx_id;
        self.store.set(anchor)?;
        telemetry::record_anchor(&self.identity, tx_id);
        tracing::info!(server = %self.identity, tx_id, "Pinned trust anchor");
        Ok(())
    }

    /// Tells the server that `key` at `tx_id` failed verification. The
    /// report carries the current anchor's hash and signature so the server
    /// can see which state the client trusted.
    pub async fn report_tamper(
        &self,
        key: impl Into<Vec<u8>>,
        tx_id: u64,
    ) -> Result<(), ClientError> {
        let _guard = self.locks.acquire(&self.identity).await;
        let anchor = self
            .store
            .get(&self.identity)?
            .ok_or_else(|| ClientError::BootstrapRequired(self.identity.clone()))?;

        let report = TamperReport {
            key: key.into(),
            tx_id,
            root: anchor.tx_hash,
            signature: anchor.signature,
        };
        self.timed(self.transport.report_tamper(report)).await?;

        telemetry::record_tamper_report(&self.identity);
        tracing::warn!(
            server = %self.identity,
            tx_id,
            anchor_tx = anchor.tx_id,
            "Tamper report sent"
        );
        Ok(())
    }

    async fn read(
        &self,
        kind: &'static str,
        key: Vec<u8>,
        at_tx: Option<u64>,
        since_tx: Option<u64>,
    ) -> Result<VerifiedEntry, ClientError> {
        let _guard = self.locks.acquire(&self.identity).await;
        let mut op = Operation::start(kind, &self.identity);

        let anchor = self.load_anchor(&mut op)?;
        let request = ReadRequest {
            key: key.clone(),
            at_tx,
            since_tx,
            prove_since_tx: anchor.tx_id,
        };

        let resp = self.send(&mut op, self.transport.read(request)).await?;
        let (proved, tx_id) = op.check(proved_leaf(&key, at_tx, &resp))?;

        let ReadResponse {
            entry,
            inclusion_proof,
            dual_proof,
            signature,
        } = resp;
        let eh_root = dual_proof.claimed_metadata(anchor.tx_id, tx_id).eh_root;

        let candidate = op.check(self.verifier.verify(
            &proved,
            tx_id,
            &eh_root,
            &inclusion_proof,
            &dual_proof,
            &anchor,
            &signature,
        ))?;

        self.advance_anchor(&mut op, &anchor, candidate)?;
        op.verified(tx_id);

        Ok(VerifiedEntry {
            entry: proved,
            value: entry.value,
            tx_id,
        })
    }

    fn commit_write(
        &self,
        op: &mut Operation<'_>,
        anchor: &TrustAnchor,
        proved: &[Entry],
        resp: WriteResponse,
    ) -> Result<VerifiedTx, ClientError> {
        op.check(self.check_write_shape(anchor, proved.len(), &resp))?;

        let eh_root = resp.tx.metadata.eh_root;
        for (entry, proof) in proved.iter().zip(&resp.inclusion_proofs) {
            op.check(self.verifier.verify_inclusion(entry, proof, &eh_root))?;
        }

        let candidate = op.check(self.verifier.verify_consistency(
            resp.tx.id,
            &eh_root,
            &resp.dual_proof,
            anchor,
            &resp.signature,
        ))?;

        let verified = VerifiedTx {
            id: resp.tx.id,
            entries_count: resp.tx.entries_count,
            alh: candidate.tx_hash,
        };

        self.advance_anchor(op, anchor, candidate)?;
        op.verified(verified.id);
        Ok(verified)
    }

    fn check_write_shape(
        &self,
        anchor: &TrustAnchor,
        submitted: usize,
        resp: &WriteResponse,
    ) -> Result<(), VerificationFailure> {
        let tx = &resp.tx;
        let expected = submitted as u64 + u64::from(self.config.bookkeeping_entries_per_write);

        if tx.id != tx.metadata.id || tx.entries_count != tx.metadata.entries_count {
            return Err(shape("transaction header disagrees with its metadata"));
        }
        // The proved ALH is derived from the dual proof's copy of the
        // metadata, so the header must be that exact copy.
        if *resp.dual_proof.claimed_metadata(anchor.tx_id, tx.id) != tx.metadata {
            return Err(shape(format!(
                "metadata of tx {} differs from the proved metadata",
                tx.id
            )));
        }
        if tx.id <= anchor.tx_id {
            return Err(shape(format!(
                "write landed in tx {} but tx {} is already trusted",
                tx.id, anchor.tx_id
            )));
        }
        if u64::from(tx.entries_count) != expected {
            return Err(shape(format!(
                "tx {} holds {} entries, expected {}",
                tx.id, tx.entries_count, expected
            )));
        }
        if resp.inclusion_proofs.len() != submitted {
            return Err(shape(format!(
                "{} inclusion proofs for {} entries",
                resp.inclusion_proofs.len(),
                submitted
            )));
        }
        Ok(())
    }

    fn load_anchor(&self, op: &mut Operation<'_>) -> Result<TrustAnchor, ClientError> {
        let anchor = match op.check(self.store.get(&self.identity))? {
            Some(anchor) => anchor,
            None if self.config.trust_on_first_use => {
                tracing::warn!(
                    server = %self.identity,
                    "No trust anchor, accepting first verified answer (trust-on-first-use)"
                );
                TrustAnchor::genesis(self.identity.clone())
            }
            None => {
                return Err(op.reject(ClientError::BootstrapRequired(self.identity.clone())));
            }
        };
        op.advance(OperationState::AnchorLoaded);
        Ok(anchor)
    }

    async fn send<R>(
        &self,
        op: &mut Operation<'_>,
        request: impl Future<Output = Result<R, TransportFailure>>,
    ) -> Result<R, ClientError> {
        op.advance(OperationState::RequestSent);
        let resp = self.timed(request).await;
        let resp = op.check(resp)?;
        op.advance(OperationState::ProofReceived);
        Ok(resp)
    }

    async fn timed<R>(
        &self,
        request: impl Future<Output = Result<R, TransportFailure>>,
    ) -> Result<R, TransportFailure> {
        let limit = self.config.request_timeout;
        tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(TransportFailure::Timeout(limit)))
    }

    /// Persists `candidate` when it moves the anchor forward. Must complete
    /// before the verified result is returned.
    fn advance_anchor(
        &self,
        op: &mut Operation<'_>,
        anchor: &TrustAnchor,
        candidate: TrustAnchor,
    ) -> Result<(), ClientError> {
        if !candidate.is_newer_than(anchor) {
            return Ok(());
        }
        let (from, to) = (anchor.tx_id, candidate.tx_id);
        op.check(self.store.set(candidate))?;
        telemetry::record_anchor(&self.identity, to);
        tracing::info!(server = %self.identity, from, to, "Trust anchor advanced");
        Ok(())
    }
}

/// The leaf a read response claims to prove, and the tx holding it. A read
/// through a reference proves the reference leaf, not the resolved value.
fn proved_leaf(
    key: &[u8],
    at_tx: Option<u64>,
    resp: &ReadResponse,
) -> Result<(Entry, u64), VerificationFailure> {
    let entry = &resp.entry;
    let (proved, tx_id) = match &entry.referenced_by {
        None => {
            if entry.key != key {
                return Err(shape("server answered for a different key"));
            }
            (Entry::plain(entry.key.clone(), entry.value.clone()), entry.tx)
        }
        Some(reference) => {
            if reference.key != key {
                return Err(shape("server answered through a different reference"));
            }
            (
                Entry::reference(reference.key.clone(), entry.key.clone(), reference.at_tx),
                reference.tx,
            )
        }
    };

    if let Some(at) = at_tx {
        if tx_id != at {
            return Err(shape(format!("asked for tx {} but got tx {}", at, tx_id)));
        }
    }
    Ok((proved, tx_id))
}

fn shape(msg: impl Into<String>) -> VerificationFailure {
    VerificationFailure::UnexpectedShape(msg.into())
}
