mod common;

use common::{MockBackend, bridge_for, submit_button};
use reel_engine::backend::BackendError;
use reel_engine::model::ElementSnapshot;
use reel_engine::scanner::ELEMENT_PROBE_JS;

#[tokio::test]
async fn test_navigate_launches_driver_once() {
    let mock = MockBackend::new();
    let bridge = bridge_for(&mock);

    let result = bridge.navigate("https://x.test").await.unwrap();
    assert_eq!(result.url, "https://x.test");
    bridge.navigate("https://x.test/2").await.unwrap();

    assert!(mock.page().launched);
    assert_eq!(mock.page().navigations.len(), 2);
}

#[tokio::test]
async fn test_navigation_failure_propagates() {
    let mock = MockBackend::new();
    mock.page().fail_navigation = true;
    let bridge = bridge_for(&mock);

    let err = bridge.navigate("https://x.test").await.unwrap_err();
    assert!(matches!(err, BackendError::Navigation(_)));
}

#[tokio::test]
async fn test_evaluate_turns_failures_and_null_into_none() {
    let mock = MockBackend::new();
    let bridge = bridge_for(&mock);

    assert!(bridge.evaluate(ELEMENT_PROBE_JS).await.is_none());

    mock.page().element = Some(submit_button());
    let snapshot: ElementSnapshot = bridge.evaluate_as(ELEMENT_PROBE_JS).await.unwrap();
    assert_eq!(snapshot.id, "submit");
    assert_eq!(snapshot.sibling_index, Some(0));

    mock.page().fail_scripts = true;
    assert!(bridge.evaluate(ELEMENT_PROBE_JS).await.is_none());
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let mock = MockBackend::new();
    let bridge = bridge_for(&mock);
    bridge.navigate("https://x.test").await.unwrap();

    bridge.shutdown().await;
    bridge.clone().shutdown().await;
    bridge.shutdown().await;

    assert!(bridge.is_shut_down());
    assert_eq!(mock.page().closes, 1);
}

#[tokio::test]
async fn test_calls_after_shutdown_fail_softly() {
    let mock = MockBackend::new();
    mock.page().element = Some(submit_button());
    let bridge = bridge_for(&mock);
    bridge.shutdown().await;

    assert!(bridge.evaluate(ELEMENT_PROBE_JS).await.is_none());
    assert!(bridge.screenshot().await.is_none());
    assert!(matches!(
        bridge.navigate("https://x.test").await,
        Err(BackendError::NotReady)
    ));
    assert_eq!(mock.page().screenshots, 0);
}
