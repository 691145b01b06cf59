use crate::error::Result;
use crate::subscription::{ZoneEvent, ZoneEventReceiver};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// WebSocket client for the zone feed
///
/// The feed pushes one JSON subscription message per text frame
/// (`{"response": "Subscribed" | "Changed" | ..., "data": {...}}`). Each one
/// is parsed into a [`ZoneEvent`] and handed to the receiver. The receiver
/// reports [`crate::BridgeError::ConnectionClosed`] once the socket ends.
pub struct ZoneFeed {
    url: String,
    reader: JoinHandle<()>,
}

impl ZoneFeed {
    /// Connect to the feed at `url`.
    ///
    /// Returns the feed together with its receiver. Events queue without
    /// limit, so no zone snapshot is lost to a slow consumer.
    pub async fn connect(url: impl Into<String>) -> Result<(Self, ZoneEventReceiver)> {
        let url = url.into();
        tracing::info!("Connecting to zone feed at {}", url);

        let (ws_stream, _) = connect_async(&url).await?;
        let (mut write, mut read) = ws_stream.split();

        let (tx, rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(async move {
            while let Some(msg_result) = read.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => Self::handle_message(&tx, &text),
                    Ok(Message::Close(_)) => {
                        tracing::info!("Zone feed closed");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("Zone feed error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            let _ = write.close().await;
        });

        Ok((
            Self { url, reader },
            ZoneEventReceiver::new(rx),
        ))
    }

    fn handle_message(tx: &mpsc::UnboundedSender<ZoneEvent>, text: &str) {
        tracing::debug!("Received: {}", text);

        match ZoneEvent::from_json(text) {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => tracing::warn!("Ignoring unreadable feed message: {}", e),
        }
    }

    /// Feed URL this connection was opened with
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the feed connection has ended
    pub fn is_closed(&self) -> bool {
        self.reader.is_finished()
    }
}

impl Drop for ZoneFeed {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
