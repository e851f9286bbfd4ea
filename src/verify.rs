//! Proof Verifier.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::codec;
use crate::error::VerificationFailure;
use crate::primitives::ProofPrimitives;
use crate::types::{Digest, DualProof, Entry, InclusionProof, TrustAnchor};

/// Checks a single server answer against the current trust anchor.
///
/// The verifier is pure: it never touches the trust state store. On success
/// it hands back the anchor the caller should persist; on failure nothing has
/// changed.
#[derive(Debug, Clone)]
pub struct ProofVerifier<P> {
    primitives: P,
}

impl<P: ProofPrimitives> ProofVerifier<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Full check of one entry: inclusion in `eh_root`, then consistency of
    /// transaction `tx_id` with `anchor`.
    ///
    /// Returns the anchor candidate: the claimed transaction when it is at or
    /// after the anchor, the unchanged anchor for a historical read.
    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
        entry: &Entry,
        tx_id: u64,
        eh_root: &Digest,
        inclusion_proof: &InclusionProof,
        dual_proof: &DualProof,
        anchor: &TrustAnchor,
        signature: &[u8],
    ) -> Result<TrustAnchor, VerificationFailure> {
        self.verify_inclusion(entry, inclusion_proof, eh_root)?;
        self.verify_consistency(tx_id, eh_root, dual_proof, anchor, signature)
    }

    pub fn verify_inclusion(
        &self,
        entry: &Entry,
        proof: &InclusionProof,
        eh_root: &Digest,
    ) -> Result<(), VerificationFailure> {
        let leaf = codec::encode_leaf(entry)
            .map_err(|e| VerificationFailure::UnexpectedShape(e.to_string()))?;

        if !self.primitives.verify_inclusion(&leaf, proof, eh_root) {
            return Err(VerificationFailure::Inclusion);
        }
        Ok(())
    }

    pub fn verify_consistency(
        &self,
        tx_id: u64,
        eh_root: &Digest,
        dual_proof: &DualProof,
        anchor: &TrustAnchor,
        signature: &[u8],
    ) -> Result<TrustAnchor, VerificationFailure> {
        // Dual proofs only run forward, so source/target follow ascending tx
        // id no matter which side is the new transaction.
        let forward = anchor.tx_id <= tx_id;
        let claimed = dual_proof.claimed_metadata(anchor.tx_id, tx_id);

        if claimed.id != tx_id {
            return Err(VerificationFailure::UnexpectedShape(format!(
                "proof describes tx {} but tx {} was claimed",
                claimed.id, tx_id
            )));
        }
        if claimed.eh_root != *eh_root {
            return Err(VerificationFailure::UnexpectedShape(format!(
                "entry root does not match metadata of tx {}",
                tx_id
            )));
        }

        let claimed_alh = self.primitives.tx_alh(claimed);
        let claimed_anchor = TrustAnchor::new(
            anchor.server_identity.clone(),
            tx_id,
            claimed_alh,
            signature.to_vec(),
        );

        if anchor.is_genesis() {
            return Ok(claimed_anchor);
        }

        let (source_tx, target_tx, source_alh, target_alh) = if forward {
            (anchor.tx_id, tx_id, anchor.tx_hash, claimed_alh)
        } else {
            (tx_id, anchor.tx_id, claimed_alh, anchor.tx_hash)
        };

        if !self.primitives.verify_consistency(
            dual_proof,
            source_tx,
            target_tx,
            &source_alh,
            &target_alh,
        ) {
            return Err(VerificationFailure::Consistency {
                source_tx,
                target_tx,
            });
        }

        if forward {
            Ok(claimed_anchor)
        } else {
            Ok(anchor.clone())
        }
    }
}
