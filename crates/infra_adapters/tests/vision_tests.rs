//! HTTP vision classifier error mapping

use std::time::Duration;

use core_kernel::PortError;
use domain_claims::{Classifier, ClassifierKind, ImageReference};
use infra_adapters::HttpVisionClassifier;
use test_utils::scratch_dir;

#[test]
fn test_empty_endpoint_rejected() {
    let result = HttpVisionClassifier::new("  ", Duration::from_secs(1));
    assert!(matches!(result, Err(PortError::Validation { .. })));
}

#[tokio::test]
async fn test_image_without_content_rejected() {
    let classifier = HttpVisionClassifier::new("http://127.0.0.1:9/classify", Duration::from_secs(1)).unwrap();
    assert_eq!(classifier.kind(), ClassifierKind::RealModel);

    let result = classifier.classify(&ImageReference::named("car.jpg")).await;
    assert!(matches!(result, Err(PortError::Validation { .. })));
}

#[tokio::test]
async fn test_unreachable_model_is_connection_error() {
    let dir = scratch_dir("vision");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("car.jpg");
    tokio::fs::write(&path, b"\xFF\xD8\xFF").await.unwrap();

    let classifier = HttpVisionClassifier::new("http://127.0.0.1:9/classify", Duration::from_secs(2)).unwrap();
    let result = classifier.classify(&ImageReference::stored("car.jpg", &path)).await;
    assert!(matches!(result, Err(PortError::Connection { .. }) | Err(PortError::Timeout { .. })));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
