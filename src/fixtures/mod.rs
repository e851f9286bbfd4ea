//! Deterministic fixtures.
//!
//! [`Blake3Primitives`] is a reference implementation of the proof
//! primitives capability and [`MemoryLedger`] a proving ledger built on it.
//! They back the test suites and demos; production deployments inject the
//! primitives matching their server.

pub mod ledger;
pub mod merkle;

pub use ledger::{LedgerError, MemoryLedger, BOOKKEEPING_KEY};
pub use merkle::Blake3Primitives;
