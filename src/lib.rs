//! ENROLLIQ: Enrollment Operational Intelligence
//!
//! Resilient inference dispatch for live enrollment analytics.
//!
//! ## Architecture
//!
//! - **Dispatcher**: routes feature records to analytic models, remote-first
//!   with guaranteed local fallback — a result is always produced
//! - **Remote boundary**: single bounded-time HTTP attempt against the
//!   inference service, with an explicit response schema
//! - **Fallback Estimators**: pure per-model approximations (anomaly
//!   detection, segmentation, demand forecasting) with no I/O
//! - **History Ledger**: bounded most-recent-first record of past
//!   predictions for operator review

pub mod config;
pub mod dispatcher;
pub mod estimators;
pub mod history;
pub mod remote;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, DispatchConfig};

// Re-export commonly used types
pub use types::{
    FeatureRecord, HistoryEntry, ModelKind, PredictionResult, Provenance, RiskLevel, RiskOrCluster,
};

// Re-export the dispatch surface
pub use dispatcher::{DispatchStats, Dispatcher};
pub use history::HistoryLedger;
pub use remote::{RemoteError, RemoteModelClient};
