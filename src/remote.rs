//! Remote inference boundary — HTTP client for dispatcher → model service
//!
//! Issues a single bounded-time POST carrying the model kind and feature
//! record, and parses the response against an explicit schema. Transport
//! errors, timeouts, non-success statuses and shape mismatches all collapse
//! into [`RemoteError`]; the dispatcher treats them uniformly and the
//! subtypes exist only for diagnostic logging.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    FeatureRecord, ModelKind, PredictionResult, Provenance, RiskLevel, RiskOrCluster,
};

/// Remote boundary errors
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned status {0}")]
    ServerError(reqwest::StatusCode),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Request payload sent to the inference service
#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    model_kind: ModelKind,
    features: &'a FeatureRecord,
}

/// Well-formed response shape expected from the inference service.
///
/// Anything that fails to deserialize into this shape is a uniform failure;
/// there is no "whichever key exists" probing of the payload.
#[derive(Debug, Deserialize)]
struct RemoteResponse {
    /// Server-reported model identity
    model: String,
    /// Primary human-readable verdict
    prediction: String,
    /// The original backend renders confidence as a numeric string, so both
    /// JSON numbers and numeric strings are accepted
    #[serde(deserialize_with = "number_or_numeric_string")]
    confidence: f64,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
    #[serde(default)]
    cluster_id: Option<u8>,
    details: IndexMap<String, serde_json::Value>,
}

impl RemoteResponse {
    /// Validate the payload against the result invariants and convert it
    /// into a [`PredictionResult`] tagged with remote provenance.
    fn into_result(self, kind: ModelKind) -> Result<PredictionResult, RemoteError> {
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(RemoteError::MalformedResponse(format!(
                "confidence {} outside [0, 100]",
                self.confidence
            )));
        }
        if self.details.is_empty() {
            return Err(RemoteError::MalformedResponse(
                "details must not be empty".to_string(),
            ));
        }

        let risk_or_cluster = match kind {
            ModelKind::AnomalyDetection => {
                let level = self.risk_level.ok_or_else(|| {
                    RemoteError::MalformedResponse("missing risk_level".to_string())
                })?;
                Some(RiskOrCluster::Risk(level))
            }
            ModelKind::Segmentation => {
                let cluster = self.cluster_id.ok_or_else(|| {
                    RemoteError::MalformedResponse("missing cluster_id".to_string())
                })?;
                Some(RiskOrCluster::Cluster(cluster))
            }
            ModelKind::DemandForecast => None,
        };

        let mut details = IndexMap::with_capacity(self.details.len());
        for (key, value) in self.details {
            let rendered = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(RemoteError::MalformedResponse(format!(
                        "detail '{key}' has unsupported type: {other}"
                    )))
                }
            };
            details.insert(key, rendered);
        }

        Ok(PredictionResult {
            model_label: self.model,
            provenance: Provenance::Remote,
            headline: self.prediction,
            confidence: self.confidence,
            risk_or_cluster,
            details,
        })
    }
}

/// Accept confidence as a JSON number or a numeric string like "75.0".
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("confidence is not a finite number")),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("confidence '{s}' is not numeric"))),
        _ => Err(serde::de::Error::custom(
            "confidence must be a number or numeric string",
        )),
    }
}

/// HTTP client for the remote inference service
#[derive(Debug, Clone)]
pub struct RemoteModelClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteModelClient {
    /// Create a client for the given endpoint with a per-request timeout.
    pub fn new(endpoint: &str, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Run a single scoring attempt against the remote service.
    ///
    /// No retries: the caller's fallback path already guarantees a result,
    /// and retrying would only delay it.
    pub async fn predict(
        &self,
        kind: ModelKind,
        features: &FeatureRecord,
    ) -> Result<PredictionResult, RemoteError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&RemoteRequest {
                model_kind: kind,
                features,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RemoteError::ServerError(resp.status()));
        }

        let body = resp.bytes().await?;
        let parsed: RemoteResponse = serde_json::from_slice(&body)
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;

        parsed.into_result(kind)
    }

    /// Endpoint URL for logging
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
