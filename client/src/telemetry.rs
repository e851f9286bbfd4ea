// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const VERIFIED_TOTAL: &str = "ledger_trust_verified_total";
pub const REJECTED_TOTAL: &str = "ledger_trust_rejected_total";
pub const ANCHOR_TX: &str = "ledger_trust_anchor_tx";
pub const TAMPER_REPORTS_TOTAL: &str = "ledger_trust_tamper_reports_total";

/// Install the tracing subscriber only. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ledger_trust_client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Initialize telemetry (logs + metrics) for a host application.
pub fn init_telemetry() {
    init_tracing();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::warn!("Prometheus recorder not installed: {}", e),
    }

    describe_metrics();
}

pub fn describe_metrics() {
    metrics::describe_counter!(VERIFIED_TOTAL, "Verified operations that advanced or confirmed the anchor");
    metrics::describe_counter!(REJECTED_TOTAL, "Operations rejected, labelled by reason");
    metrics::describe_gauge!(ANCHOR_TX, "Transaction id of the current trust anchor, per server");
    metrics::describe_counter!(TAMPER_REPORTS_TOTAL, "Tamper reports delivered to the server");
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

pub(crate) fn record_verified(operation: &'static str) {
    metrics::increment_counter!(VERIFIED_TOTAL, "operation" => operation);
}

pub(crate) fn record_rejected(operation: &'static str, reason: &'static str) {
    metrics::increment_counter!(REJECTED_TOTAL, "operation" => operation, "reason" => reason);
}

pub(crate) fn record_anchor(server_identity: &str, tx_id: u64) {
    metrics::gauge!(ANCHOR_TX, tx_id as f64, server_labels(server_identity));
}

pub(crate) fn record_tamper_report(server_identity: &str) {
    metrics::increment_counter!(TAMPER_REPORTS_TOTAL, server_labels(server_identity));
}

fn server_labels(server_identity: &str) -> Vec<metrics::Label> {
    vec![metrics::Label::new("server", server_identity.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_gauge_is_labelled_by_server() {
        assert_eq!(
            server_labels("ledger-a:3322"),
            vec![metrics::Label::new("server", "ledger-a:3322")]
        );
        assert_ne!(server_labels("ledger-a:3322"), server_labels("ledger-b:3322"));

        // No recorder installed: recording is a no-op, never a panic.
        record_anchor("ledger-a:3322", 7);
        record_tamper_report("ledger-a:3322");
    }
}
