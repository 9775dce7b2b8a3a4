//! End-to-end dispatch tests against a simulated remote inference boundary.
//!
//! The mock server stands in for the inference service; the unreachable
//! cases point the dispatcher at a closed local port.

use std::time::Duration;

use enrolliq::{
    DispatchConfig, Dispatcher, FeatureRecord, ModelKind, Provenance, RiskLevel, RiskOrCluster,
};

fn config_for(endpoint: &str) -> DispatchConfig {
    DispatchConfig {
        endpoint: endpoint.to_string(),
        request_timeout: Duration::from_secs(2),
        history_capacity: 5,
    }
}

/// Endpoint that refuses connections, for the fallback path.
fn unreachable_config() -> DispatchConfig {
    config_for("http://127.0.0.1:9/api/predict")
}

fn sample_features() -> FeatureRecord {
    FeatureRecord::new("560001", "Karnataka", "Bengaluru Urban", 50, 120, 200)
}

fn well_formed_body() -> String {
    serde_json::json!({
        "model": "Isolation Forest",
        "prediction": "NORMAL",
        "confidence": "85.0",
        "risk_level": "LOW",
        "details": {
            "anomaly_score": "0.1850",
            "total_enrollments": 370,
            "recommendation": "No action needed. Pattern within normal range."
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_remote_success_keeps_server_identity() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(well_formed_body())
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(&config_for(&format!("{}/api/predict", server.url())));
    let result = dispatcher
        .dispatch(ModelKind::AnomalyDetection, sample_features())
        .await;

    mock.assert_async().await;
    assert_eq!(result.provenance, Provenance::Remote);
    assert_eq!(result.model_label, "Isolation Forest");
    assert_eq!(result.headline, "NORMAL");
    assert_eq!(result.confidence, 85.0);
    assert_eq!(
        result.risk_or_cluster,
        Some(RiskOrCluster::Risk(RiskLevel::Low))
    );

    let stats = dispatcher.stats();
    assert_eq!(stats.remote_count, 1);
    assert_eq!(stats.fallback_count, 0);
}

#[tokio::test]
async fn test_provenance_distinguishes_remote_from_fallback() {
    let features = sample_features();

    // Same input through a healthy boundary...
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(well_formed_body())
        .create_async()
        .await;
    let online = Dispatcher::new(&config_for(&format!("{}/api/predict", server.url())));
    let remote_result = online
        .dispatch(ModelKind::AnomalyDetection, features.clone())
        .await;

    // ...and through an unreachable one.
    let offline = Dispatcher::new(&unreachable_config());
    let fallback_result = offline
        .dispatch(ModelKind::AnomalyDetection, features)
        .await;

    assert_eq!(remote_result.provenance, Provenance::Remote);
    assert_eq!(fallback_result.provenance, Provenance::LocalFallback);
    assert_ne!(remote_result.model_label, fallback_result.model_label);
    assert!(fallback_result.model_label.contains("offline"));
}

#[tokio::test]
async fn test_server_error_routes_to_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/predict")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(&config_for(&format!("{}/api/predict", server.url())));
    let result = dispatcher
        .dispatch(ModelKind::Segmentation, sample_features())
        .await;

    assert_eq!(result.provenance, Provenance::LocalFallback);
    // total 370 lands in the High Volume cluster
    assert_eq!(result.risk_or_cluster, Some(RiskOrCluster::Cluster(0)));
    assert_eq!(dispatcher.stats().fallback_count, 1);
}

#[tokio::test]
async fn test_malformed_payload_routes_to_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok", "something": "else"}"#)
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(&config_for(&format!("{}/api/predict", server.url())));
    let result = dispatcher
        .dispatch(ModelKind::DemandForecast, sample_features())
        .await;

    assert_eq!(result.provenance, Provenance::LocalFallback);
    assert!(!result.details.is_empty());
}

#[tokio::test]
async fn test_dispatch_is_total_with_boundary_down() {
    let dispatcher = Dispatcher::new(&unreachable_config());

    for kind in ModelKind::all() {
        for features in [
            FeatureRecord::new("", "", "", 0, 0, 0),
            sample_features(),
            FeatureRecord::new("110001", "Delhi", "New Delhi", 900, 0, 0),
        ] {
            let result = dispatcher.dispatch(kind, features).await;
            assert!(
                (0.0..=100.0).contains(&result.confidence),
                "{kind}: confidence {} out of range",
                result.confidence
            );
            assert!(!result.details.is_empty(), "{kind}: empty details");
        }
    }
}

#[tokio::test]
async fn test_exactly_one_history_entry_per_dispatch() {
    let dispatcher = Dispatcher::new(&unreachable_config());
    assert!(dispatcher.recent_history().is_empty());

    dispatcher
        .dispatch(ModelKind::AnomalyDetection, sample_features())
        .await;
    assert_eq!(dispatcher.recent_history().len(), 1);

    dispatcher
        .dispatch(ModelKind::DemandForecast, sample_features())
        .await;
    assert_eq!(dispatcher.recent_history().len(), 2);
}

#[tokio::test]
async fn test_history_evicts_oldest_after_capacity() {
    let dispatcher = Dispatcher::new(&unreachable_config());

    for i in 1..=6 {
        let features =
            FeatureRecord::new(&format!("56000{i}"), "Karnataka", "Bengaluru", i, i * 2, i * 3);
        dispatcher.dispatch(ModelKind::Segmentation, features).await;
    }

    let history = dispatcher.recent_history();
    assert_eq!(history.len(), 5);
    // Most recent first: the 6th dispatch leads, the 1st has been evicted
    assert_eq!(history[0].request.pincode, "560006");
    assert_eq!(history[4].request.pincode, "560002");
}

#[tokio::test]
async fn test_history_records_normalized_request() {
    let dispatcher = Dispatcher::new(&unreachable_config());
    let features = FeatureRecord {
        pincode: " 560001 ".to_string(),
        state: "Karnataka ".to_string(),
        district: " Bengaluru".to_string(),
        age_0_5: 1,
        age_5_17: 2,
        age_18_plus: 3,
    };

    dispatcher.dispatch(ModelKind::Segmentation, features).await;

    let history = dispatcher.recent_history();
    assert_eq!(history[0].request.pincode, "560001");
    assert_eq!(history[0].request.state, "Karnataka");
}

#[tokio::test]
async fn test_stats_track_both_paths() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(well_formed_body())
        .expect(2)
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(&config_for(&format!("{}/api/predict", server.url())));
    dispatcher
        .dispatch(ModelKind::AnomalyDetection, sample_features())
        .await;
    dispatcher
        .dispatch(ModelKind::AnomalyDetection, sample_features())
        .await;

    let stats = dispatcher.stats();
    assert_eq!(stats.dispatch_count, 2);
    assert_eq!(stats.remote_count, 2);
    assert_eq!(stats.fallback_count, 0);
}
