use crate::error::{BridgeError, Result};
use crate::types::{SeekUpdate, Zone, ZoneId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

/// Zone subscription message as it arrives on the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionMessage {
    /// `Subscribed`, `Changed`, or anything else the core sends
    pub response: String,
    #[serde(default)]
    pub data: Value,
}

/// Zone update from the subscription
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    /// Full zone list sent when the subscription starts
    Subscribed { zones: Vec<Zone> },

    /// Incremental change
    Changed {
        /// Added or changed zones, full snapshots
        zones_changed: Vec<Zone>,
        /// Position-only updates
        zones_seek_changed: Vec<SeekUpdate>,
        /// Ids of zones that went away
        zones_removed: Vec<ZoneId>,
    },

    /// Any other response kind, carried for logging only
    Other(String),
}

impl ZoneEvent {
    /// Interpret a subscription message.
    ///
    /// Zone entries that fail to parse are logged and left out rather than
    /// failing the whole message.
    pub fn from_message(message: &SubscriptionMessage) -> Self {
        let data = &message.data;
        match message.response.as_str() {
            "Subscribed" => ZoneEvent::Subscribed {
                zones: parse_list(data, "zones"),
            },
            "Changed" => {
                let mut zones_changed: Vec<Zone> = parse_list(data, "zones_added");
                zones_changed.extend(parse_list::<Zone>(data, "zones_changed"));
                ZoneEvent::Changed {
                    zones_changed,
                    zones_seek_changed: parse_list(data, "zones_seek_changed"),
                    zones_removed: parse_list(data, "zones_removed"),
                }
            }
            other => ZoneEvent::Other(other.to_string()),
        }
    }

    /// Parse a raw feed message
    pub fn from_json(text: &str) -> Result<Self> {
        let message: SubscriptionMessage = serde_json::from_str(text)?;
        Ok(Self::from_message(&message))
    }
}

fn parse_list<T: DeserializeOwned>(data: &Value, key: &str) -> Vec<T> {
    let Some(items) = data.get(key).and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed entry in {}: {}", key, e);
                None
            }
        })
        .collect()
}

/// Receiver for zone events
pub struct ZoneEventReceiver {
    rx: mpsc::UnboundedReceiver<ZoneEvent>,
}

impl ZoneEventReceiver {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<ZoneEvent>) -> Self {
        Self { rx }
    }

    /// Receive the next zone event
    ///
    /// Fails with [`BridgeError::ConnectionClosed`] once the feed is gone.
    pub async fn recv(&mut self) -> Result<ZoneEvent> {
        self.rx.recv().await.ok_or(BridgeError::ConnectionClosed)
    }
}
