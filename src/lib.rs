//! Mirror Roon now-playing state onto a SteelSeries GameSense OLED display
//!
//! This library follows the zones of a Roon core and renders the track
//! playing in one chosen zone onto the OLED screen of a SteelSeries
//! peripheral through the GameSense display engine. It provides:
//!
//! - A zone store that gives every zone a unique slug name
//! - Seek tracking for the mirrored zone
//! - A horizontal marquee for titles wider than the screen
//! - A short "now playing" splash at the start of each track
//! - Display engine registration, liveness probing and address rediscovery
//!
//! # Quick Start
//!
//! ```no_run
//! use roon_oled_bridge::{Bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BridgeConfig {
//!         publish_zone: "kitchen".to_string(),
//!         ..Default::default()
//!     };
//!     Bridge::new(config).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Driving the pipeline directly
//!
//! The pipeline is plain synchronous state; any [`FrameSink`] can collect its
//! output:
//!
//! ```
//! use roon_oled_bridge::{DisplayFrame, DisplayPipeline, FrameBuilder, ScrollEngine, ZoneEvent};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel::<DisplayFrame>();
//! let mut pipeline =
//!     DisplayPipeline::new("kitchen", ScrollEngine::default(), FrameBuilder::default(), tx);
//!
//! let event = ZoneEvent::from_json(r#"{"response":"Subscribed","data":{"zones":[]}}"#).unwrap();
//! pipeline.handle(event);
//! assert!(rx.try_recv().is_err());
//! ```
//!
//! # Architecture
//!
//! - **Connection**: WebSocket zone feed producing [`ZoneEvent`]s
//! - **ZoneStore / SeekTracker**: authoritative zone state
//! - **ScrollEngine / FrameBuilder**: zone state to [`DisplayFrame`]
//! - **DisplayPipeline**: event dispatch, owned by a single task
//! - **DisplayEngine**: GameSense HTTP client, the production [`FrameSink`]
//! - **EngineDiscovery**: finds the engine's address from `coreProps.json`

mod bridge;
mod config;
mod connection;
mod discovery;
mod engine;
mod error;
mod frame;
mod pipeline;
mod protocol;
mod scroll;
mod seek;
mod subscription;
mod types;
mod zone_store;

// Public exports
pub use bridge::{process_events, Bridge};
pub use config::BridgeConfig;
pub use connection::ZoneFeed;
pub use discovery::{default_core_props_path, read_address, EngineDiscovery};
pub use engine::{DisplayEngine, DEFAULT_REQUEST_TIMEOUT};
pub use error::{BridgeError, Result};
pub use frame::{progress_percent, DisplayFrame, FrameBuilder, PROGRESS_RESOLUTION, SPLASH_SECONDS};
pub use pipeline::{DisplayPipeline, FrameSink};
pub use protocol::{
    BindGameEvent, Endpoint, EventData, EventFrame, GameEvent, GameIdentity, GameMetadata,
    Handler, LineSpec, RemoveGame, ScreenData,
};
pub use scroll::{ScrollEngine, DEFAULT_DISPLAY_WIDTH, SCROLL_SEPARATOR};
pub use seek::SeekTracker;
pub use subscription::{SubscriptionMessage, ZoneEvent, ZoneEventReceiver};
pub use types::{
    NowPlaying, OneLine, SeekSeconds, SeekUpdate, ThreeLine, TwoLine, Zone, ZoneId, ZoneState,
};
pub use zone_store::{slugify, ZoneStore, PLACEHOLDER_SLUG};
