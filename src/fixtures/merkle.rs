// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! BLAKE3 reference primitives.
//!
//! ```text
//! leaf hash   = BLAKE3(0x00 | leaf)
//! node hash   = BLAKE3(0x01 | left | right)     odd node promoted unchanged
//! linear step = BLAKE3(id (u64 LE) | acc | inner_hash(tx id))
//! ```

use crate::primitives::ProofPrimitives;
use crate::types::{Digest, DualProof, InclusionProof, ProofStep, Side, ZERO_DIGEST};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Primitives;

pub fn leaf_hash(leaf: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(leaf);
    *hasher.finalize().as_bytes()
}

fn node_hash(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

fn next_level(level: &[Digest]) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => node_hash(left, right),
            [single] => *single,
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

/// Root over already-hashed leaves. An empty tree has the zero root.
pub fn tree_root(leaf_hashes: &[Digest]) -> Digest {
    if leaf_hashes.is_empty() {
        return ZERO_DIGEST;
    }
    let mut level = leaf_hashes.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

pub fn inclusion_proof(leaf_hashes: &[Digest], index: usize) -> Option<InclusionProof> {
    if index >= leaf_hashes.len() {
        return None;
    }

    let mut level = leaf_hashes.to_vec();
    let mut pos = index;
    let mut terms = Vec::new();

    while level.len() > 1 {
        if pos % 2 == 0 {
            if pos + 1 < level.len() {
                terms.push(ProofStep {
                    sibling: level[pos + 1],
                    side: Side::Right,
                });
            }
        } else {
            terms.push(ProofStep {
                sibling: level[pos - 1],
                side: Side::Left,
            });
        }
        level = next_level(&level);
        pos /= 2;
    }

    Some(InclusionProof {
        leaf_index: index as u32,
        width: leaf_hashes.len() as u32,
        terms,
    })
}

impl ProofPrimitives for Blake3Primitives {
    fn digest(&self, bytes: &[u8]) -> Digest {
        blake3::hash(bytes).into()
    }

    fn verify_inclusion(&self, leaf: &[u8], proof: &InclusionProof, root: &Digest) -> bool {
        if proof.leaf_index >= proof.width {
            return false;
        }

        let mut current = leaf_hash(leaf);
        for step in &proof.terms {
            current = match step.side {
                Side::Left => node_hash(&step.sibling, &current),
                Side::Right => node_hash(&current, &step.sibling),
            };
        }
        current == *root
    }

    fn verify_consistency(
        &self,
        proof: &DualProof,
        source_tx: u64,
        target_tx: u64,
        source_alh: &Digest,
        target_alh: &Digest,
    ) -> bool {
        if source_tx > target_tx {
            return false;
        }
        let source = &proof.source_tx_metadata;
        let target = &proof.target_tx_metadata;
        if source.id != source_tx || target.id != target_tx {
            return false;
        }
        if self.tx_alh(source) != *source_alh || self.tx_alh(target) != *target_alh {
            return false;
        }
        if proof.linear_terms.len() as u64 != target_tx - source_tx {
            return false;
        }
        if let Some(last) = proof.linear_terms.last() {
            if *last != self.tx_inner_hash(target) {
                return false;
            }
        }

        let mut acc = *source_alh;
        for (offset, term) in proof.linear_terms.iter().enumerate() {
            let id = source_tx + 1 + offset as u64;
            let mut buf = Vec::with_capacity(8 + 32 + 32);
            buf.extend_from_slice(&id.to_le_bytes());
            buf.extend_from_slice(&acc);
            buf.extend_from_slice(term);
            acc = self.digest(&buf);
        }
        acc == *target_alh
    }
}
