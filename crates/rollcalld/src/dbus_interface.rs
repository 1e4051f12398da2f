//! D-Bus interface for the Rollcall attendance daemon.
//!
//! Bus name: org.freedesktop.Rollcall1
//! Object path: /org/freedesktop/Rollcall1
//!
//! Methods mirror the logical API surface: recognize an image, then the
//! four attendance queries. Responses are JSON strings so thin clients
//! can pass them through unchanged.

use rollcall_core::{aggregate, Roster, SystemClock};
use rollcall_store::Ledger;
use zbus::fdo;
use zbus::interface;

use crate::gateway::{GatewayError, HttpGateway};
use crate::ingest::{IngestError, IngestFlow};

pub struct RollcallService {
    flow: IngestFlow<HttpGateway, SystemClock>,
    ledger: Ledger,
    roster: Roster,
}

impl RollcallService {
    pub fn new(
        flow: IngestFlow<HttpGateway, SystemClock>,
        ledger: Ledger,
        roster: Roster,
    ) -> Self {
        Self { flow, ledger, roster }
    }
}

/// Map the typed error taxonomy onto D-Bus error names. The transport
/// keeps the kinds distinct instead of collapsing everything into one
/// generic failure.
fn ingest_err(e: IngestError) -> fdo::Error {
    match e {
        IngestError::MissingInput => fdo::Error::InvalidArgs(e.to_string()),
        IngestError::Recognition(GatewayError::Timeout(_)) => fdo::Error::Timeout(e.to_string()),
        IngestError::Recognition(GatewayError::Failed(_)) => fdo::Error::Failed(e.to_string()),
        IngestError::Storage(_) => fdo::Error::IOError(e.to_string()),
    }
}

fn storage_err(e: rollcall_store::LedgerError) -> fdo::Error {
    fdo::Error::IOError(e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> fdo::Result<String> {
    serde_json::to_string(value).map_err(|e| fdo::Error::Failed(format!("encoding reply: {e}")))
}

#[interface(name = "org.freedesktop.Rollcall1")]
impl RollcallService {
    /// Classify a base64-encoded image and mark attendance when the
    /// prediction clears the confidence threshold. Returns the
    /// recognition result as JSON either way.
    async fn recognize(&self, image_base64: &str) -> fdo::Result<String> {
        tracing::info!(payload_len = image_base64.len(), "recognize requested");
        let recognition = self.flow.ingest(image_base64).await.map_err(ingest_err)?;
        to_json(&recognition)
    }

    /// Total recorded days plus per-member presence counts.
    async fn total_attendance(&self) -> fdo::Result<String> {
        let records = self.ledger.all_records().await.map_err(storage_err)?;
        to_json(&aggregate::total_summary(&records, &self.roster))
    }

    /// Days recorded and days `name` was present. Unknown names get zero
    /// counts, not an error.
    async fn user_attendance(&self, name: &str) -> fdo::Result<String> {
        let records = self.ledger.all_records().await.map_err(storage_err)?;
        to_json(&aggregate::user_summary(&records, name))
    }

    /// Presence of every roster member on `date`. A date with no record
    /// reports everyone absent.
    async fn daily_attendance(&self, date: &str) -> fdo::Result<String> {
        let record = self.ledger.records_for_date(date).await.map_err(storage_err)?;
        to_json(&aggregate::daily_snapshot(record.as_ref(), &self.roster))
    }

    /// Per-date presence of `name` over every recorded date.
    async fn user_history(&self, name: &str) -> fdo::Result<String> {
        let records = self.ledger.all_records().await.map_err(storage_err)?;
        to_json(&aggregate::history(&records, name))
    }

    /// Daemon status information.
    async fn status(&self) -> fdo::Result<String> {
        let records = self.ledger.all_records().await.map_err(storage_err)?;
        Ok(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "roster_size": self.roster.len(),
            "recorded_days": records.len(),
        })
        .to_string())
    }
}
