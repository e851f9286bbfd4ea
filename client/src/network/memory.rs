// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-process transport over a [`MemoryLedger`].
//!
//! Used by tests and demos. Tamper hooks rewrite responses after the ledger
//! produced them, which is how a compromised server or a man in the middle
//! looks from the client's side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ledger_trust::fixtures::{LedgerError, MemoryLedger};
use ledger_trust::wire::{
    ReadRequest, ReadResponse, ReferenceRequest, ServerState, TamperReport, WriteRequest,
    WriteResponse,
};
use tokio::sync::Mutex;

use super::LedgerTransport;
use crate::errors::TransportFailure;

type ReadHook = Arc<dyn Fn(&mut ReadResponse) + Send + Sync>;
type WriteHook = Arc<dyn Fn(&mut WriteResponse) + Send + Sync>;

#[derive(Clone, Default)]
pub struct MemoryTransport {
    ledger: Arc<Mutex<MemoryLedger>>,
    latency: Option<Duration>,
    read_hook: Option<ReadHook>,
    write_hook: Option<WriteHook>,
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("latency", &self.latency)
            .field("read_hook", &self.read_hook.is_some())
            .field("write_hook", &self.write_hook.is_some())
            .finish()
    }
}

impl MemoryTransport {
    pub fn new(ledger: MemoryLedger) -> Self {
        Self::shared(Arc::new(Mutex::new(ledger)))
    }

    /// Several transports (and tests) may observe the same ledger.
    pub fn shared(ledger: Arc<Mutex<MemoryLedger>>) -> Self {
        Self {
            ledger,
            latency: None,
            read_hook: None,
            write_hook: None,
        }
    }

    pub fn ledger(&self) -> Arc<Mutex<MemoryLedger>> {
        self.ledger.clone()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn tamper_reads(mut self, hook: impl Fn(&mut ReadResponse) + Send + Sync + 'static) -> Self {
        self.read_hook = Some(Arc::new(hook));
        self
    }

    pub fn tamper_writes(
        mut self,
        hook: impl Fn(&mut WriteResponse) + Send + Sync + 'static,
    ) -> Self {
        self.write_hook = Some(Arc::new(hook));
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn finish_write(
        &self,
        result: Result<WriteResponse, LedgerError>,
    ) -> Result<WriteResponse, TransportFailure> {
        let mut resp = result.map_err(to_transport)?;
        if let Some(hook) = &self.write_hook {
            hook(&mut resp);
        }
        Ok(resp)
    }
}

fn to_transport(err: LedgerError) -> TransportFailure {
    let status = match err {
        LedgerError::KeyNotFound => 404,
        _ => 400,
    };
    TransportFailure::Status {
        status,
        message: err.to_string(),
    }
}

#[async_trait]
impl LedgerTransport for MemoryTransport {
    async fn write(&self, request: WriteRequest) -> Result<WriteResponse, TransportFailure> {
        self.delay().await;
        let result = self.ledger.lock().await.write(&request);
        self.finish_write(result)
    }

    async fn set_reference(
        &self,
        request: ReferenceRequest,
    ) -> Result<WriteResponse, TransportFailure> {
        self.delay().await;
        let result = self.ledger.lock().await.set_reference(&request);
        self.finish_write(result)
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse, TransportFailure> {
        self.delay().await;
        let mut resp = self.ledger.lock().await.read(&request).map_err(to_transport)?;
        if let Some(hook) = &self.read_hook {
            hook(&mut resp);
        }
        Ok(resp)
    }

    async fn current_state(&self) -> Result<ServerState, TransportFailure> {
        self.delay().await;
        Ok(self.ledger.lock().await.state())
    }

    /// Recorded on the ledger, see [`MemoryLedger::tamper_reports`].
    async fn report_tamper(&self, report: TamperReport) -> Result<(), TransportFailure> {
        self.delay().await;
        self.ledger.lock().await.report_tamper(report);
        Ok(())
    }
}
