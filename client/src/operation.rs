// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Verified operation state machine.
//!
//! ```text
//! Start -> AnchorLoaded -> RequestSent -> ProofReceived -> Verified
//!   \__________\_______________\________________\_______-> Rejected
//! ```
//!
//! Rejected is reachable from every non-terminal state and never touches the
//! trust anchor. Verified is only entered after the new anchor is durable.

use crate::errors::{ClientError, TransportFailure};
use crate::telemetry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationState {
    Start,
    AnchorLoaded,
    RequestSent,
    ProofReceived,
    Verified,
    Rejected,
}

impl OperationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, OperationState::Verified | OperationState::Rejected)
    }

    pub fn can_advance_to(self, next: OperationState) -> bool {
        use OperationState::*;
        match (self, next) {
            (from, Rejected) => !from.is_terminal(),
            (Start, AnchorLoaded)
            | (AnchorLoaded, RequestSent)
            | (RequestSent, ProofReceived)
            | (ProofReceived, Verified) => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct Operation<'a> {
    kind: &'static str,
    identity: &'a str,
    state: OperationState,
}

impl<'a> Operation<'a> {
    pub fn start(kind: &'static str, identity: &'a str) -> Self {
        tracing::debug!(op = kind, server = identity, "Operation started");
        Self {
            kind,
            identity,
            state: OperationState::Start,
        }
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn advance(&mut self, next: OperationState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(
            op = self.kind,
            server = self.identity,
            "{:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    pub fn verified(&mut self, tx_id: u64) {
        self.advance(OperationState::Verified);
        telemetry::record_verified(self.kind);
        tracing::debug!(op = self.kind, server = self.identity, tx_id, "Verified");
    }

    /// Moves to `Rejected` and hands the error back for propagation.
    pub fn reject(&mut self, err: ClientError) -> ClientError {
        let from = self.state;
        self.advance(OperationState::Rejected);
        telemetry::record_rejected(self.kind, err.reason());

        if err.is_tamper_evidence() {
            tracing::error!(
                op = self.kind,
                server = self.identity,
                "Tamper evidence in {:?}: {}",
                from,
                err
            );
        } else {
            tracing::warn!(op = self.kind, server = self.identity, "Rejected in {:?}: {}", from, err);
        }
        err
    }

    pub fn check<T, E: Into<ClientError>>(&mut self, result: Result<T, E>) -> Result<T, ClientError> {
        result.map_err(|e| self.reject(e.into()))
    }

    /// Rejects an operation that ends without reaching a terminal state,
    /// e.g. its future was dropped mid-request. Returns whether it did.
    pub fn abandon(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.reject(TransportFailure::Cancelled.into());
        true
    }
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        self.abandon();
    }
}
