//! Segmentation fallback estimator.
//!
//! Three fixed volume bands derived from the trained k-means cluster
//! centroids. Confidence is the externally measured silhouette score of the
//! grouping model, not a function of the specific input.

use indexmap::IndexMap;

use crate::types::estimator_constants::{
    CLUSTER_HIGH_THRESHOLD, CLUSTER_MEDIUM_THRESHOLD, SILHOUETTE_SCORE,
};
use crate::types::{FeatureRecord, PredictionResult, Provenance, RiskOrCluster};

/// Offline model label for segmentation
pub const SEGMENTATION_MODEL_LABEL: &str = "K-Means Clustering (offline)";

/// Assign a feature record to a volume cluster.
pub fn estimate_segmentation(features: &FeatureRecord) -> PredictionResult {
    let total = features.total_enrollments();

    let (cluster, cluster_name, priority, recommendation) = if total > CLUSTER_HIGH_THRESHOLD {
        (
            0u8,
            "High Volume Zone",
            "Priority 1 - Needs additional resources",
            "Deploy mobile van and additional staff",
        )
    } else if total > CLUSTER_MEDIUM_THRESHOLD {
        (
            1,
            "Medium Volume Zone",
            "Priority 2 - Monitor closely",
            "Schedule periodic camps",
        )
    } else {
        (
            2,
            "Low Volume Zone",
            "Priority 3 - Standard service",
            "Maintain current service level",
        )
    };

    let mut details = IndexMap::new();
    details.insert(
        "silhouette_score".to_string(),
        format!("{SILHOUETTE_SCORE:.4}"),
    );
    details.insert("cluster_name".to_string(), cluster_name.to_string());
    details.insert("priority_level".to_string(), priority.to_string());
    details.insert("recommendation".to_string(), recommendation.to_string());

    PredictionResult {
        model_label: SEGMENTATION_MODEL_LABEL.to_string(),
        provenance: Provenance::LocalFallback,
        headline: format!("Cluster {cluster}: {cluster_name}"),
        confidence: SILHOUETTE_SCORE * 100.0,
        risk_or_cluster: Some(RiskOrCluster::Cluster(cluster)),
        details,
    }
}
