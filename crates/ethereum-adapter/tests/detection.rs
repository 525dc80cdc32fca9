mod common;

use std::time::Duration;

use common::{FakeProvider, FakeSource, RecordingReporter, RecordingSurface};
use ethereum_adapter::{Adapter, AdapterConfig, AdapterError, DetectOptions, Provider, ProviderDetector};
use serde_json::json;

#[tokio::test]
async fn test_absent_provider_is_fatal() {
    let detector = ProviderDetector::new(DetectOptions::default());
    let source = FakeSource::empty();

    assert!(matches!(
        detector.detect(&source).await,
        Err(AdapterError::ProviderAbsent)
    ));
    // Polled for the whole timeout before giving up.
    assert_eq!(source.sleeps.get() as u64, DetectOptions::default().retries());
}

#[tokio::test]
async fn test_absent_provider_wires_nothing() {
    let result = Adapter::start(
        &FakeSource::empty(),
        RecordingSurface::default(),
        RecordingReporter::default(),
        &AdapterConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(AdapterError::ProviderAbsent)));
}

#[tokio::test]
async fn test_late_injection_is_found() {
    let provider = FakeProvider::new();
    let source = FakeSource::new(vec![None, None, Some(provider.clone())], Some(provider.clone()));

    let detected = ProviderDetector::new(DetectOptions::default())
        .detect(&source)
        .await
        .unwrap();

    assert!(detected.provider.same_instance(&provider));
    assert!(!detected.conflict);
    assert_eq!(source.sleeps.get(), 2);
}

#[tokio::test]
async fn test_timeout_bounds_polling() {
    let provider = FakeProvider::new();
    let source = FakeSource::new(vec![None, None, Some(provider.clone())], Some(provider));
    let options = DetectOptions {
        timeout: Duration::from_millis(100),
        poll_interval: Duration::from_millis(100),
        ..Default::default()
    };

    assert!(matches!(
        ProviderDetector::new(options).detect(&source).await,
        Err(AdapterError::ProviderAbsent)
    ));
    assert_eq!(source.sleeps.get(), 1);
}

#[tokio::test]
async fn test_conflict_uses_ambient_provider() {
    let detected = FakeProvider::new();
    let ambient = FakeProvider::new();
    let source = FakeSource::new(vec![Some(detected.clone())], Some(ambient.clone()));

    let result = ProviderDetector::new(DetectOptions::default())
        .detect(&source)
        .await
        .unwrap();

    assert!(result.conflict);
    assert!(result.provider.same_instance(&ambient));
    assert!(!result.provider.same_instance(&detected));
}

#[tokio::test]
async fn test_conflict_adapter_talks_to_ambient() {
    let detected = FakeProvider::new();
    let ambient = FakeProvider::new();
    ambient
        .respond("eth_chainId", Ok(json!("0x1")))
        .respond("eth_accounts", Ok(json!([])));
    let source = FakeSource::new(vec![Some(detected.clone())], Some(ambient.clone()));

    Adapter::start(
        &source,
        RecordingSurface::default(),
        RecordingReporter::default(),
        &AdapterConfig::default(),
    )
    .await
    .unwrap();

    assert!(detected.calls().is_empty());
    assert_eq!(ambient.calls().len(), 2);
}

#[tokio::test]
async fn test_must_be_metamask() {
    let options = DetectOptions {
        must_be_metamask: true,
        silent: true,
        ..Default::default()
    };

    let other = FakeProvider::new();
    assert!(matches!(
        ProviderDetector::new(options.clone())
            .detect(&FakeSource::injected(&other))
            .await,
        Err(AdapterError::ProviderAbsent)
    ));

    let metamask = FakeProvider::metamask();
    let detected = ProviderDetector::new(options)
        .detect(&FakeSource::injected(&metamask))
        .await
        .unwrap();
    assert!(detected.provider.is_metamask());
}
