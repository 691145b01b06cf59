//! Display engine address file handling

use roon_oled_bridge::{read_address, BridgeError, EngineDiscovery};
use std::time::Duration;

#[tokio::test]
async fn reads_address_from_core_props() {
    let dir = tempfile::tempdir().unwrap();
    let props = dir.path().join("coreProps.json");
    std::fs::write(
        &props,
        r#"{"address":"127.0.0.1:49152","encrypted_address":"127.0.0.1:49153"}"#,
    )
    .unwrap();

    assert_eq!(read_address(&props).await.unwrap(), "127.0.0.1:49152");
    assert_eq!(
        EngineDiscovery::from_file(&props).locate().await.unwrap(),
        "127.0.0.1:49152"
    );
}

#[tokio::test]
async fn malformed_file_is_a_discovery_error() {
    let dir = tempfile::tempdir().unwrap();
    let props = dir.path().join("coreProps.json");
    std::fs::write(&props, "{ not json").unwrap();

    let err = read_address(&props).await.unwrap_err();
    assert!(matches!(err, BridgeError::DiscoveryMalformed { .. }));
    assert!(err.is_discovery());
}

#[tokio::test]
async fn missing_or_empty_address_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let props = dir.path().join("coreProps.json");

    std::fs::write(&props, r#"{"port": 1234}"#).unwrap();
    assert!(matches!(
        read_address(&props).await,
        Err(BridgeError::DiscoveryMalformed { .. })
    ));

    std::fs::write(&props, r#"{"address": "  "}"#).unwrap();
    assert!(matches!(
        read_address(&props).await,
        Err(BridgeError::DiscoveryMalformed { .. })
    ));
}

#[tokio::test]
async fn address_change_is_picked_up_on_next_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let props = dir.path().join("coreProps.json");
    let discovery = EngineDiscovery::from_file(&props);

    std::fs::write(&props, r#"{"address":"127.0.0.1:1000"}"#).unwrap();
    assert_eq!(discovery.locate().await.unwrap(), "127.0.0.1:1000");

    std::fs::write(&props, r#"{"address":"127.0.0.1:2000"}"#).unwrap();
    assert_eq!(discovery.locate().await.unwrap(), "127.0.0.1:2000");
}

#[tokio::test]
async fn backoff_waits_for_engine_to_appear() {
    let dir = tempfile::tempdir().unwrap();
    let props = dir.path().join("coreProps.json");
    let discovery = EngineDiscovery::from_file(&props)
        .with_backoff(Duration::from_millis(10), Duration::from_millis(50));

    let writer_path = props.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        std::fs::write(&writer_path, r#"{"address":"127.0.0.1:3000"}"#).unwrap();
    });

    let address = discovery.locate_with_backoff(None).await.unwrap();
    assert_eq!(address, "127.0.0.1:3000");
    writer.await.unwrap();
}

#[tokio::test]
async fn backoff_stops_at_attempt_limit() {
    let dir = tempfile::tempdir().unwrap();
    let discovery = EngineDiscovery::from_file(dir.path().join("coreProps.json"))
        .with_backoff(Duration::from_millis(1), Duration::from_millis(2));

    let err = discovery.locate_with_backoff(Some(3)).await.unwrap_err();
    assert!(matches!(err, BridgeError::DiscoveryFileMissing(_)));
}
