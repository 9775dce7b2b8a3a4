//! Fallback Estimators
//!
//! One pure function per model kind, used when the remote inference
//! boundary cannot produce a result. Estimators never fail: every input,
//! including an all-zero record, yields a well-formed prediction with
//! confidence in [0, 100] and non-empty details.
//!
//! The original models mixed their scoring rules with a random
//! perturbation. Here the perturbation is a deterministic function of the
//! feature record (md5-derived), so estimator output is stable and
//! directly assertable in tests.

mod anomaly;
mod forecast;
mod segmentation;

pub use anomaly::estimate_anomaly;
pub use forecast::estimate_forecast;
pub use segmentation::estimate_segmentation;

use crate::types::{FeatureRecord, ModelKind, PredictionResult};

/// Run the fallback estimator matching `kind`.
pub fn estimate(kind: ModelKind, features: &FeatureRecord) -> PredictionResult {
    match kind {
        ModelKind::AnomalyDetection => estimate_anomaly(features),
        ModelKind::Segmentation => estimate_segmentation(features),
        ModelKind::DemandForecast => estimate_forecast(features),
    }
}

/// Deterministic unit-interval fraction derived from the feature record.
///
/// Same record, same fraction. The digest covers every field so distinct
/// records spread across [0, 1).
pub(crate) fn jitter_fraction(features: &FeatureRecord) -> f64 {
    let digest = md5::compute(format!(
        "{}|{}|{}|{}|{}|{}",
        features.pincode,
        features.state,
        features.district,
        features.age_0_5,
        features.age_5_17,
        features.age_18_plus
    ));
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.0[..8]);
    (u64::from_be_bytes(bytes) as f64) / (u64::MAX as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(a: u32, b: u32, c: u32) -> FeatureRecord {
        FeatureRecord::new("560001", "Karnataka", "Bengaluru", a, b, c)
    }

    #[test]
    fn test_jitter_is_deterministic() {
        let features = record(50, 120, 200);

        assert_eq!(jitter_fraction(&features), jitter_fraction(&features));
    }

    #[test]
    fn test_jitter_varies_with_input() {
        let a = record(50, 120, 200);
        let b = record(50, 120, 201);

        assert_ne!(jitter_fraction(&a), jitter_fraction(&b));
    }

    #[test]
    fn test_jitter_within_unit_interval() {
        for i in 0..50 {
            let fraction = jitter_fraction(&record(i, i * 3, i * 7));
            assert!((0.0..1.0).contains(&fraction));
        }
    }

    #[test]
    fn test_all_estimators_total_on_zero_input() {
        let features = record(0, 0, 0);

        for kind in ModelKind::all() {
            let result = estimate(kind, &features);
            assert!(
                (0.0..=100.0).contains(&result.confidence),
                "{kind}: confidence {} out of range",
                result.confidence
            );
            assert!(!result.details.is_empty(), "{kind}: empty details");
            assert!(!result.headline.is_empty(), "{kind}: empty headline");
        }
    }
}
