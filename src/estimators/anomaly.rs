//! Anomaly-detection fallback estimator.
//!
//! Rule-based approximation of the trained isolation forest: flags records
//! with unusually high volume, high per-band average, or a skewed infant
//! share. The skew rule is only evaluated when the total is non-zero so an
//! all-zero record is never vacuously anomalous.

use indexmap::IndexMap;

use super::jitter_fraction;
use crate::types::estimator_constants::{
    ANOMALY_AVERAGE_THRESHOLD, ANOMALY_INFANT_RATIO, ANOMALY_JITTER_MAX, ANOMALY_SCORE_DIVISOR,
    ANOMALY_SCORE_MAX, ANOMALY_TOTAL_THRESHOLD,
};
use crate::types::{FeatureRecord, PredictionResult, Provenance, RiskLevel, RiskOrCluster};

/// Offline model label for anomaly detection
pub const ANOMALY_MODEL_LABEL: &str = "Isolation Forest (offline)";

/// Score a feature record for anomalous enrollment patterns.
pub fn estimate_anomaly(features: &FeatureRecord) -> PredictionResult {
    let total = features.total_enrollments();
    let average = total as f64 / 3.0;
    let infant_skew =
        total > 0 && f64::from(features.age_0_5) > ANOMALY_INFANT_RATIO * total as f64;

    let is_anomaly =
        total > ANOMALY_TOTAL_THRESHOLD || average > ANOMALY_AVERAGE_THRESHOLD || infant_skew;

    let jitter = jitter_fraction(features) * ANOMALY_JITTER_MAX;
    let anomaly_score = (total as f64 / ANOMALY_SCORE_DIVISOR + jitter).clamp(0.0, ANOMALY_SCORE_MAX);

    let confidence = if is_anomaly {
        anomaly_score * 100.0
    } else {
        (1.0 - anomaly_score) * 100.0
    };

    let (headline, risk, recommendation) = if is_anomaly {
        (
            "ANOMALY DETECTED",
            RiskLevel::High,
            "Flag for manual review. Unusual enrollment pattern detected.",
        )
    } else {
        (
            "NORMAL",
            RiskLevel::Low,
            "No action needed. Pattern within normal range.",
        )
    };

    let mut details = IndexMap::new();
    details.insert("anomaly_score".to_string(), format!("{anomaly_score:.4}"));
    details.insert("total_enrollments".to_string(), total.to_string());
    details.insert("recommendation".to_string(), recommendation.to_string());

    PredictionResult {
        model_label: ANOMALY_MODEL_LABEL.to_string(),
        provenance: Provenance::LocalFallback,
        headline: headline.to_string(),
        confidence,
        risk_or_cluster: Some(RiskOrCluster::Risk(risk)),
        details,
    }
}
