// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transport seam between the verified client and a ledger server.
//!
//! Implementations move requests and responses; they never judge them.
//! Everything a transport returns is untrusted until the proof verifier has
//! accepted it.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use ledger_trust::wire::{
    ReadRequest, ReadResponse, ReferenceRequest, ServerState, TamperReport, WriteRequest,
    WriteResponse,
};

use crate::errors::TransportFailure;

pub use http::HttpTransport;
pub use memory::MemoryTransport;

#[async_trait]
pub trait LedgerTransport: Send + Sync {
    async fn write(&self, request: WriteRequest) -> Result<WriteResponse, TransportFailure>;

    async fn set_reference(
        &self,
        request: ReferenceRequest,
    ) -> Result<WriteResponse, TransportFailure>;

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse, TransportFailure>;

    /// Unverified head of the ledger.
    async fn current_state(&self) -> Result<ServerState, TransportFailure>;

    async fn report_tamper(&self, report: TamperReport) -> Result<(), TransportFailure>;
}

#[async_trait]
impl<T: LedgerTransport + ?Sized> LedgerTransport for std::sync::Arc<T> {
    async fn write(&self, request: WriteRequest) -> Result<WriteResponse, TransportFailure> {
        (**self).write(request).await
    }

    async fn set_reference(
        &self,
        request: ReferenceRequest,
    ) -> Result<WriteResponse, TransportFailure> {
        (**self).set_reference(request).await
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse, TransportFailure> {
        (**self).read(request).await
    }

    async fn current_state(&self) -> Result<ServerState, TransportFailure> {
        (**self).current_state().await
    }

    async fn report_tamper(&self, report: TamperReport) -> Result<(), TransportFailure> {
        (**self).report_tamper(report).await
    }
}
