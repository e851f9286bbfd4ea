// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use async_trait::async_trait;
use ledger_trust::wire::{
    ReadRequest, ReadResponse, ReferenceRequest, ServerState, TamperReport, WriteRequest,
    WriteResponse,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::LedgerTransport;
use crate::config::ClientConfig;
use crate::errors::TransportFailure;

pub const API_KEY_HEADER: &str = "lc-api-key";

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.with_key(self.client.post(format!("{}{}", self.base_url, path)))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.with_key(self.client.get(format!("{}{}", self.base_url, path)))
    }

    fn with_key(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, TransportFailure> {
        let resp = Self::send_raw(builder).await?;
        resp.json()
            .await
            .map_err(|e| TransportFailure::Decode(e.to_string()))
    }

    /// Sends and checks the status, leaving the body unread.
    async fn send_raw(builder: RequestBuilder) -> Result<Response, TransportFailure> {
        let resp = builder
            .send()
            .await
            .map_err(|e| TransportFailure::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl LedgerTransport for HttpTransport {
    async fn write(&self, request: WriteRequest) -> Result<WriteResponse, TransportFailure> {
        Self::send(self.post("/v1/verified/set").json(&request)).await
    }

    async fn set_reference(
        &self,
        request: ReferenceRequest,
    ) -> Result<WriteResponse, TransportFailure> {
        Self::send(self.post("/v1/verified/set-reference").json(&request)).await
    }

    async fn read(&self, request: ReadRequest) -> Result<ReadResponse, TransportFailure> {
        Self::send(self.post("/v1/verified/get").json(&request)).await
    }

    async fn current_state(&self) -> Result<ServerState, TransportFailure> {
        Self::send(self.get("/v1/state")).await
    }

    async fn report_tamper(&self, report: TamperReport) -> Result<(), TransportFailure> {
        Self::send_raw(self.post("/v1/report-tamper").json(&report)).await?;
        Ok(())
    }
}
