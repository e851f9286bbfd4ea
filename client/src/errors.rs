// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use ledger_trust::{StateStoreError, VerificationFailure};
use std::time::Duration;
use thiserror::Error;

/// The request never produced an answer worth verifying. Retrying is safe:
/// the trust anchor was not touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Operation cancelled before a proof was received")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportFailure),
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationFailure),
    #[error("Trust state error: {0}")]
    State(#[from] StateStoreError),
    #[error("No trust anchor for {0}: bootstrap or pin one first")]
    BootstrapRequired(String),
    #[error("Anchor for {identity} is at tx {current}, refusing to move it back to tx {requested}")]
    AnchorRegression {
        identity: String,
        current: u64,
        requested: u64,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Only transport failures may be retried transparently.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// The server produced an answer that contradicts the trusted history.
    pub fn is_tamper_evidence(&self) -> bool {
        matches!(
            self,
            ClientError::Verification(
                VerificationFailure::Inclusion | VerificationFailure::Consistency { .. }
            )
        )
    }

    /// Stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "transport",
            ClientError::Verification(VerificationFailure::Inclusion) => "inclusion",
            ClientError::Verification(VerificationFailure::Consistency { .. }) => "consistency",
            ClientError::Verification(VerificationFailure::UnexpectedShape(_)) => "unexpected_shape",
            ClientError::State(_) => "state",
            ClientError::BootstrapRequired(_) => "bootstrap_required",
            ClientError::AnchorRegression { .. } => "anchor_regression",
            ClientError::InvalidRequest(_) => "invalid_request",
        }
    }
}
