//! Resilient Inference Dispatcher
//!
//! Routes a feature record to the requested model kind: one bounded-time
//! remote attempt, then the matching local estimator on any failure. A
//! dispatch always resolves to a `PredictionResult` — remote failures are
//! absorbed, logged for diagnostics, and never surfaced to the operator.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::estimators;
use crate::history::HistoryLedger;
use crate::remote::RemoteModelClient;
use crate::types::{FeatureRecord, HistoryEntry, ModelKind, PredictionResult};

/// Running counters for dispatch outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Total completed dispatches
    pub dispatch_count: u64,
    /// Dispatches resolved by the remote boundary
    pub remote_count: u64,
    /// Dispatches resolved by a local estimator
    pub fallback_count: u64,
}

/// Inference dispatcher with graceful degradation.
///
/// Owns its history ledger (capacity injected via [`DispatchConfig`]) so
/// independent dispatchers can be tested in isolation. At most one dispatch
/// is in flight at a time; concurrent callers queue on an internal async
/// mutex, which also fixes history append order.
#[derive(Debug)]
pub struct Dispatcher {
    client: RemoteModelClient,
    ledger: HistoryLedger,
    in_flight: tokio::sync::Mutex<()>,
    stats: Mutex<DispatchStats>,
}

impl Dispatcher {
    /// Create a dispatcher from configuration.
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            client: RemoteModelClient::new(&config.endpoint, config.request_timeout),
            ledger: HistoryLedger::new(config.history_capacity),
            in_flight: tokio::sync::Mutex::new(()),
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    /// Score a feature record with the requested model kind.
    ///
    /// Never fails. The remote boundary gets a single attempt bounded by
    /// the configured timeout; transport errors, timeouts, non-success
    /// statuses and malformed payloads all route to the matching fallback
    /// estimator. Exactly one history entry is recorded per call,
    /// whichever path produced the result.
    pub async fn dispatch(&self, kind: ModelKind, features: FeatureRecord) -> PredictionResult {
        let _guard = self.in_flight.lock().await;
        let start = Instant::now();

        let features = features.normalized();

        let (result, was_remote) = match self.client.predict(kind, &features).await {
            Ok(result) => (result, true),
            Err(e) => {
                warn!(
                    model = %kind,
                    endpoint = %self.client.endpoint(),
                    error = %e,
                    "Remote inference failed, using local estimator"
                );
                (estimators::estimate(kind, &features), false)
            }
        };

        {
            let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
            stats.dispatch_count += 1;
            if was_remote {
                stats.remote_count += 1;
            } else {
                stats.fallback_count += 1;
            }
        }

        debug!(
            latency_ms = start.elapsed().as_millis(),
            model = %kind,
            provenance = ?result.provenance,
            confidence = result.confidence,
            "Dispatch complete"
        );

        self.ledger.record(HistoryEntry {
            result: result.clone(),
            request: features,
            produced_at: Utc::now(),
        });

        result
    }

    /// Retained dispatch history, most recent first.
    pub fn recent_history(&self) -> Vec<HistoryEntry> {
        self.ledger.recent()
    }

    /// Snapshot of the outcome counters.
    pub fn stats(&self) -> DispatchStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
