//! Prediction types: ModelKind, PredictionResult, HistoryEntry, estimator constants.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FeatureRecord;

/// Threshold and scoring constants for the local fallback estimators.
///
/// The confidence constants (silhouette score, forecast accuracy) are the
/// externally measured quality of the trained models the estimators
/// approximate; they do not depend on any specific input.
pub mod estimator_constants {
    /// Total enrollments above which a record is flagged anomalous
    pub const ANOMALY_TOTAL_THRESHOLD: u64 = 500;
    /// Per-age-band average above which a record is flagged anomalous
    pub const ANOMALY_AVERAGE_THRESHOLD: f64 = 200.0;
    /// Infant share of total above which a record is flagged anomalous
    pub const ANOMALY_INFANT_RATIO: f64 = 0.5;
    /// Divisor mapping total enrollments into the raw anomaly score
    pub const ANOMALY_SCORE_DIVISOR: f64 = 1000.0;
    /// Anomaly score ceiling
    pub const ANOMALY_SCORE_MAX: f64 = 0.99;
    /// Upper bound of the deterministic anomaly score perturbation
    pub const ANOMALY_JITTER_MAX: f64 = 0.05;
    /// Totals above this fall in the High Volume cluster (cluster 0)
    pub const CLUSTER_HIGH_THRESHOLD: u64 = 300;
    /// Totals above this (and at most the high threshold) are Medium Volume
    pub const CLUSTER_MEDIUM_THRESHOLD: u64 = 100;
    /// Silhouette score of the trained grouping model
    pub const SILHOUETTE_SCORE: f64 = 0.9134;
    /// Measured accuracy of the trained forecasting model (%)
    pub const FORECAST_ACCURACY_PCT: f64 = 93.1;
    /// Baseline substituted when the 18+ band is zero
    pub const FORECAST_DEFAULT_BASELINE: u32 = 100;
    /// Lower edge of the forecast growth band (15%)
    pub const FORECAST_GROWTH_MIN: f64 = 0.15;
    /// Width of the forecast growth band (15-25% total)
    pub const FORECAST_GROWTH_SPAN: f64 = 0.10;
    /// Fractional offset of the forecast lower/upper bounds
    pub const FORECAST_BOUND_FRACTION: f64 = 0.15;
    /// Enrollments served per staff member
    pub const FORECAST_STAFF_RATIO: u64 = 50;
}

/// The analytic task requested by the operator. Exactly one is active per
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    AnomalyDetection,
    Segmentation,
    DemandForecast,
}

impl ModelKind {
    /// Wire identifier used in the remote request payload
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnomalyDetection => "anomaly_detection",
            Self::Segmentation => "segmentation",
            Self::DemandForecast => "demand_forecast",
        }
    }

    /// Human-readable model name for display surfaces
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AnomalyDetection => "Anomaly Detection",
            Self::Segmentation => "Location Grouping",
            Self::DemandForecast => "Demand Prediction",
        }
    }

    /// One-line description of what the model does
    pub fn description(&self) -> &'static str {
        match self {
            Self::AnomalyDetection => "Find suspicious enrollment patterns",
            Self::Segmentation => "Group similar areas by volume",
            Self::DemandForecast => "Predict future enrollments",
        }
    }

    /// All model kinds, in display order
    pub fn all() -> [Self; 3] {
        [Self::AnomalyDetection, Self::Segmentation, Self::DemandForecast]
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk classification attached to anomaly-detection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a result came from: the remote inference boundary or the local
/// fallback path. Also reflected in `PredictionResult::model_label` so
/// downstream consumers can audit provenance either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Remote,
    LocalFallback,
}

/// Model-kind-specific classification payload.
///
/// Present for anomaly detection (risk level) and segmentation (cluster id),
/// absent for demand forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskOrCluster {
    Risk(RiskLevel),
    Cluster(u8),
}

/// Uniform prediction output, identical in shape regardless of model kind
/// or origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Human-readable model identity; fallback results carry an "(offline)"
    /// suffix
    pub model_label: String,
    /// Remote vs local-fallback origin
    pub provenance: Provenance,
    /// Primary human-readable verdict
    pub headline: String,
    /// Always within [0, 100]
    pub confidence: f64,
    pub risk_or_cluster: Option<RiskOrCluster>,
    /// Auxiliary explanatory fields; insertion order preserved for stable
    /// display. Never empty.
    pub details: IndexMap<String, String>,
}

impl PredictionResult {
    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::LocalFallback
    }
}

/// A completed dispatch retained for operator review. Created when a
/// result is accepted, never mutated, only evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub result: PredictionResult,
    pub request: FeatureRecord,
    pub produced_at: DateTime<Utc>,
}
