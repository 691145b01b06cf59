//! Zone feed end to end: a local WebSocket server plays the core's part

use futures_util::SinkExt;
use roon_oled_bridge::{
    process_events, BridgeError, DisplayFrame, DisplayPipeline, FrameBuilder, ScrollEngine,
    ZoneFeed,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

fn now_playing_zone(seek: i64) -> serde_json::Value {
    json!({
        "zone_id": "1601",
        "display_name": "Kitchen",
        "state": "playing",
        "now_playing": {
            "seek_position": seek,
            "length": 200,
            "one_line": { "line1": "Long Song Title Here - The Artist" },
            "two_line": { "line1": "Long Song Title Here", "line2": "The Artist" },
            "three_line": {
                "line1": "Long Song Title Here",
                "line2": "The Artist",
                "line3": "The Album"
            }
        }
    })
}

/// Serve one connection, send `messages`, then close
async fn serve(messages: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for message in messages {
            ws.send(Message::Text(message)).await.unwrap();
        }
        let _ = ws.close(None).await;
    });

    url
}

#[tokio::test]
async fn feed_drives_pipeline_until_close() {
    let url = serve(vec![
        json!({
            "response": "Subscribed",
            "data": { "zones": [ now_playing_zone(0), {
                "zone_id": "1602", "display_name": "Kitchen", "state": "stopped"
            } ] }
        })
        .to_string(),
        json!({ "response": "Changed", "data": {
            "zones_seek_changed": [ { "zone_id": "1601", "seek_position": 2 } ]
        }})
        .to_string(),
        json!({ "response": "Changed", "data": {
            "zones_seek_changed": [
                { "zone_id": "1601", "seek_position": 10 },
                { "zone_id": "1602", "seek_position": 10 },
                { "zone_id": "9999", "seek_position": 10 }
            ]
        }})
        .to_string(),
        "not json at all".to_string(),
        json!({ "response": "Unsubscribed" }).to_string(),
    ])
    .await;

    let (tx, mut rx) = mpsc::unbounded_channel::<DisplayFrame>();
    let mut pipeline =
        DisplayPipeline::new("kitchen", ScrollEngine::default(), FrameBuilder::default(), tx);

    let (feed, mut events) = ZoneFeed::connect(url).await.unwrap();
    let result = process_events(&mut pipeline, &mut events).await;
    assert!(matches!(result, Err(BridgeError::ConnectionClosed)));
    assert!(feed.url().starts_with("ws://127.0.0.1:"));

    let splash = rx.try_recv().unwrap();
    assert_eq!(splash.title, "kitchen now playing:");
    assert_eq!(splash.artist, "Long Song Title Here");
    assert_eq!(splash.progress, 1);

    let scrolled = rx.try_recv().unwrap();
    assert_eq!(scrolled.title, "Long Song Title Here  | ");
    assert_eq!(scrolled.artist, "The Artist");
    assert_eq!(scrolled.album, "The Album");
    assert_eq!(scrolled.progress, 5);

    assert!(rx.try_recv().is_err());

    let store = pipeline.store();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("1602").unwrap().slug_name, "kitchen_2");
    assert!(store.get("9999").is_none());
}

#[tokio::test]
async fn slow_consumer_sees_every_update() {
    let mut messages = vec![json!({
        "response": "Subscribed",
        "data": { "zones": [ now_playing_zone(0) ] }
    })
    .to_string()];
    for seek in 10..260 {
        messages.push(
            json!({ "response": "Changed", "data": {
                "zones_seek_changed": [ { "zone_id": "1601", "seek_position": seek } ]
            }})
            .to_string(),
        );
    }
    let url = serve(messages).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<DisplayFrame>();
    let mut pipeline =
        DisplayPipeline::new("kitchen", ScrollEngine::default(), FrameBuilder::default(), tx);

    let (_feed, mut events) = ZoneFeed::connect(url).await.unwrap();
    // Let the whole feed queue up before anything is consumed
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let result = process_events(&mut pipeline, &mut events).await;
    assert!(matches!(result, Err(BridgeError::ConnectionClosed)));

    let mut frames = 0;
    while rx.try_recv().is_ok() {
        frames += 1;
    }
    assert_eq!(frames, 250);
}

#[tokio::test]
async fn connect_to_nothing_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = ZoneFeed::connect(url).await.err().unwrap();
    assert!(matches!(err, BridgeError::WebSocket(_)));
}
