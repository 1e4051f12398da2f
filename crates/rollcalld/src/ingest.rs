//! Ingestion flow: image in, recognition out, attendance as a side effect.
//!
//! One call per image. The gateway classifies, the confidence gate decides
//! whether to mark attendance, and the recognition result goes back to the
//! caller either way — marking is a side effect, not a precondition.

use rollcall_core::{Clock, Roster};
use rollcall_store::{Ledger, LedgerError};
use thiserror::Error;

use crate::gateway::{GatewayError, Recognition, RecognitionGateway};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no image payload supplied")]
    MissingInput,
    #[error(transparent)]
    Recognition(#[from] GatewayError),
    #[error(transparent)]
    Storage(#[from] LedgerError),
}

/// Orchestrates recognize → threshold gate → mark present.
pub struct IngestFlow<G, C> {
    gateway: G,
    ledger: Ledger,
    roster: Roster,
    clock: C,
    /// Marks happen only for confidence strictly above this.
    threshold: f32,
    /// When set, predicted names outside the roster are not marked.
    roster_only: bool,
}

impl<G: RecognitionGateway, C: Clock> IngestFlow<G, C> {
    pub fn new(
        gateway: G,
        ledger: Ledger,
        roster: Roster,
        clock: C,
        threshold: f32,
        roster_only: bool,
    ) -> Self {
        Self { gateway, ledger, roster, clock, threshold, roster_only }
    }

    /// Classify one image and mark attendance if the prediction clears the
    /// confidence threshold. Returns the recognition result regardless of
    /// whether a mark happened.
    pub async fn ingest(&self, image_b64: &str) -> Result<Recognition, IngestError> {
        if image_b64.trim().is_empty() {
            return Err(IngestError::MissingInput);
        }

        let recognition = self.gateway.classify(image_b64).await?;
        tracing::info!(
            prediction = %recognition.prediction,
            confidence = recognition.confidence,
            "image classified"
        );

        if recognition.confidence > self.threshold {
            if self.roster_only && !self.roster.contains(&recognition.prediction) {
                tracing::warn!(
                    prediction = %recognition.prediction,
                    "prediction not on roster; attendance not marked"
                );
            } else {
                let today = self.clock.today();
                self.ledger
                    .mark_present(&today, &recognition.prediction)
                    .await?;
                tracing::info!(
                    date = %today,
                    name = %recognition.prediction,
                    "attendance marked"
                );
            }
        } else {
            tracing::debug!(
                confidence = recognition.confidence,
                threshold = self.threshold,
                "below threshold; attendance not marked"
            );
        }

        Ok(recognition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{aggregate, Member};

    /// Gateway returning a canned result.
    struct FixedGateway(Result<Recognition, &'static str>);

    impl RecognitionGateway for FixedGateway {
        async fn classify(&self, _image_b64: &str) -> Result<Recognition, GatewayError> {
            match &self.0 {
                Ok(rec) => Ok(rec.clone()),
                Err(msg) => Err(GatewayError::Failed(msg.to_string())),
            }
        }
    }

    /// Clock pinned to one date.
    struct FixedClock(&'static str);

    impl Clock for FixedClock {
        fn today(&self) -> String {
            self.0.to_string()
        }
    }

    fn roster() -> Roster {
        Roster::new(vec![
            Member { name: "Ashok".into(), id: 100 },
            Member { name: "Priyansh".into(), id: 101 },
            Member { name: "Vrajesh".into(), id: 102 },
        ])
        .unwrap()
    }

    fn recognition(name: &str, confidence: f32) -> Recognition {
        Recognition { prediction: name.into(), confidence }
    }

    async fn flow(
        result: Recognition,
        threshold: f32,
        roster_only: bool,
    ) -> (IngestFlow<FixedGateway, FixedClock>, Ledger) {
        let ledger = Ledger::open_in_memory().await.unwrap();
        let flow = IngestFlow::new(
            FixedGateway(Ok(result)),
            ledger.clone(),
            roster(),
            FixedClock("2025-03-01"),
            threshold,
            roster_only,
        );
        (flow, ledger)
    }

    #[tokio::test]
    async fn test_above_threshold_marks_attendance() {
        let (flow, ledger) = flow(recognition("Ashok", 0.99), 0.98, false).await;
        let rec = flow.ingest("aW1hZ2U=").await.unwrap();
        assert_eq!(rec.prediction, "Ashok");

        let record = ledger.records_for_date("2025-03-01").await.unwrap().unwrap();
        assert!(record.contains("Ashok"));
    }

    #[tokio::test]
    async fn test_at_threshold_does_not_mark() {
        // The gate is strictly greater-than.
        let (flow, ledger) = flow(recognition("Ashok", 0.98), 0.98, false).await;
        let rec = flow.ingest("aW1hZ2U=").await.unwrap();
        assert_eq!(rec.prediction, "Ashok");
        assert!(ledger.records_for_date("2025-03-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_below_threshold_still_returns_result() {
        let (flow, ledger) = flow(recognition("Ashok", 0.50), 0.98, false).await;
        let rec = flow.ingest("aW1hZ2U=").await.unwrap();
        assert!((rec.confidence - 0.50).abs() < 1e-6);
        assert!(ledger.records_for_date("2025-03-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_payload_is_missing_input() {
        let (flow, _ledger) = flow(recognition("Ashok", 0.99), 0.98, false).await;
        assert!(matches!(flow.ingest("").await, Err(IngestError::MissingInput)));
        assert!(matches!(flow.ingest("   ").await, Err(IngestError::MissingInput)));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let ledger = Ledger::open_in_memory().await.unwrap();
        let flow = IngestFlow::new(
            FixedGateway(Err("model crashed")),
            ledger,
            roster(),
            FixedClock("2025-03-01"),
            0.98,
            false,
        );
        assert!(matches!(
            flow.ingest("aW1hZ2U=").await,
            Err(IngestError::Recognition(GatewayError::Failed(_)))
        ));
    }

    #[tokio::test]
    async fn test_permissive_policy_records_unknown_name() {
        let (flow, ledger) = flow(recognition("Walk-In", 0.99), 0.98, false).await;
        flow.ingest("aW1hZ2U=").await.unwrap();
        let record = ledger.records_for_date("2025-03-01").await.unwrap().unwrap();
        assert!(record.contains("Walk-In"));
    }

    #[tokio::test]
    async fn test_roster_only_policy_drops_unknown_name() {
        let (flow, ledger) = flow(recognition("Walk-In", 0.99), 0.98, true).await;
        let rec = flow.ingest("aW1hZ2U=").await.unwrap();
        // Result still comes back; only the mark is dropped.
        assert_eq!(rec.prediction, "Walk-In");
        assert!(ledger.records_for_date("2025-03-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_two_day_scenario() {
        let ledger = Ledger::open_in_memory().await.unwrap();
        let r = roster();

        // Day 1: Ashok recognized twice, then Priyansh.
        for name in ["Ashok", "Ashok", "Priyansh"] {
            let flow = IngestFlow::new(
                FixedGateway(Ok(recognition(name, 0.99))),
                ledger.clone(),
                r.clone(),
                FixedClock("2025-03-01"),
                0.98,
                false,
            );
            flow.ingest("aW1hZ2U=").await.unwrap();
        }

        // Day 2: only Ashok.
        let flow = IngestFlow::new(
            FixedGateway(Ok(recognition("Ashok", 0.99))),
            ledger.clone(),
            r.clone(),
            FixedClock("2025-03-02"),
            0.98,
            false,
        );
        flow.ingest("aW1hZ2U=").await.unwrap();

        // Re-marking Ashok on day 1 left a single entry.
        let day1 = ledger.records_for_date("2025-03-01").await.unwrap().unwrap();
        assert_eq!(day1.users.len(), 2);

        let snapshot = aggregate::daily_snapshot(Some(&day1), &r);
        assert_eq!(snapshot[0].id, 100);
        assert!(snapshot[0].present);
        assert_eq!(snapshot[1].id, 101);
        assert!(snapshot[1].present);
        assert_eq!(snapshot[2].id, 102);
        assert!(!snapshot[2].present);

        let summary = aggregate::total_summary(&ledger.all_records().await.unwrap(), &r);
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.attendance["Ashok"], 2);
        assert_eq!(summary.attendance["Priyansh"], 1);
        assert_eq!(summary.attendance["Vrajesh"], 0);
    }
}
