//! Demand-forecast fallback estimator.
//!
//! Projects next-period enrollments from the adult band with a growth
//! factor inside the trained model's observed 15-25% band. The growth
//! offset is deterministic per record. A zero adult band falls back to a
//! small positive baseline so the forecast is never degenerate.

use indexmap::IndexMap;

use super::jitter_fraction;
use crate::types::estimator_constants::{
    FORECAST_ACCURACY_PCT, FORECAST_BOUND_FRACTION, FORECAST_DEFAULT_BASELINE,
    FORECAST_GROWTH_MIN, FORECAST_GROWTH_SPAN, FORECAST_STAFF_RATIO,
};
use crate::types::{FeatureRecord, PredictionResult, Provenance};

/// Offline model label for demand forecasting
pub const FORECAST_MODEL_LABEL: &str = "Random Forest Regressor (offline)";

/// Forecast next-period enrollments for a feature record.
pub fn estimate_forecast(features: &FeatureRecord) -> PredictionResult {
    let baseline = if features.age_18_plus == 0 {
        FORECAST_DEFAULT_BASELINE
    } else {
        features.age_18_plus
    };

    let growth = 1.0 + FORECAST_GROWTH_MIN + jitter_fraction(features) * FORECAST_GROWTH_SPAN;
    let forecast = (f64::from(baseline) * growth).round() as u64;

    let lower_bound = (forecast as f64 * (1.0 - FORECAST_BOUND_FRACTION)).round() as u64;
    let upper_bound = (forecast as f64 * (1.0 + FORECAST_BOUND_FRACTION)).round() as u64;

    let trend = if forecast > u64::from(baseline) {
        "Increasing"
    } else {
        "Decreasing"
    };

    let staff = forecast.div_ceil(FORECAST_STAFF_RATIO).max(1);

    let mut details = IndexMap::new();
    details.insert("predicted_value".to_string(), forecast.to_string());
    details.insert("lower_bound".to_string(), lower_bound.to_string());
    details.insert("upper_bound".to_string(), upper_bound.to_string());
    details.insert("trend".to_string(), trend.to_string());
    details.insert(
        "recommendation".to_string(),
        format!("Plan for {staff} staff members"),
    );

    PredictionResult {
        model_label: FORECAST_MODEL_LABEL.to_string(),
        provenance: Provenance::LocalFallback,
        headline: format!("{forecast} enrollments"),
        confidence: FORECAST_ACCURACY_PCT,
        risk_or_cluster: None,
        details,
    }
}
