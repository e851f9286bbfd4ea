// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Verified client for a tamper-evident ledger.
//!
//! [`LedgerClient`] wraps an untrusted [`network::LedgerTransport`] and only
//! returns answers whose inclusion and consistency proofs check out against
//! the locally stored trust anchor.

pub mod config;
pub mod errors;
pub mod telemetry;
pub mod locks;
pub mod operation;
pub mod network;
pub mod client;

pub use client::{HttpLedgerClient, LedgerClient};
pub use config::ClientConfig;
pub use errors::{ClientError, TransportFailure};
pub use locks::IdentityLocks;
pub use network::{HttpTransport, LedgerTransport, MemoryTransport};
