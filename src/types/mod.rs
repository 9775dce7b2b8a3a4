//! Core data model: feature records, model kinds, prediction results.

mod features;
mod prediction;

pub use features::FeatureRecord;
pub use prediction::{
    estimator_constants, HistoryEntry, ModelKind, PredictionResult, Provenance, RiskLevel,
    RiskOrCluster,
};
