use crate::discovery::EngineDiscovery;
use crate::error::{BridgeError, Result};
use crate::frame::SPLASH_SECONDS;
use crate::protocol::GameIdentity;
use crate::scroll::DEFAULT_DISPLAY_WIDTH;
use crate::types::SeekSeconds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bridge settings, read from a JSON file
///
/// Only `publish_zone` has no usable default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Slug of the zone to mirror on the display
    pub publish_zone: String,

    /// WebSocket URL of the zone feed
    pub feed_url: String,

    /// Characters that fit on the title line before it scrolls
    pub display_width: usize,

    /// Seconds of "now playing" splash at the start of a track
    pub splash_seconds: SeekSeconds,

    /// Restart scrolling from the first character when the title changes
    pub reset_scroll_on_track_change: bool,

    /// Fixed `host:port` of the display engine, skipping discovery
    pub engine_address: Option<String>,

    /// Location of the engine's `coreProps.json`, if not the platform default
    pub core_props_path: Option<PathBuf>,

    pub game: String,
    pub event: String,
    pub game_display_name: String,
    pub developer: String,

    pub request_timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            publish_zone: String::new(),
            feed_url: "ws://127.0.0.1:9330/zones".to_string(),
            display_width: DEFAULT_DISPLAY_WIDTH,
            splash_seconds: SPLASH_SECONDS,
            reset_scroll_on_track_change: false,
            engine_address: None,
            core_props_path: None,
            game: "SVHROON".to_string(),
            event: "NOWPLAYING".to_string(),
            game_display_name: "Roon Display Song".to_string(),
            developer: "Stef van Hooijdonk".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl BridgeConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it, for callers that layer
    /// overrides on top first
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: BridgeConfig = serde_json::from_str(&raw)
            .map_err(|e| BridgeError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check that the config can drive a bridge
    pub fn validate(&self) -> Result<()> {
        if self.publish_zone.trim().is_empty() {
            return Err(BridgeError::Config("publish_zone must be set".to_string()));
        }
        if self.feed_url.trim().is_empty() {
            return Err(BridgeError::Config("feed_url must be set".to_string()));
        }
        if self.display_width == 0 {
            return Err(BridgeError::Config("display_width must be positive".to_string()));
        }
        if self.splash_seconds < 0 {
            return Err(BridgeError::Config("splash_seconds must not be negative".to_string()));
        }
        let valid_id = |id: &str| {
            !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_')
        };
        if !valid_id(&self.game) || !valid_id(&self.event) {
            return Err(BridgeError::Config(
                "game and event may only use A-Z, 0-9, '-' and '_'".to_string(),
            ));
        }
        Ok(())
    }

    /// Game identity registered with the display engine
    pub fn identity(&self) -> GameIdentity {
        GameIdentity {
            game: self.game.clone(),
            event: self.event.clone(),
            display_name: self.game_display_name.clone(),
            developer: self.developer.clone(),
        }
    }

    /// How to find the display engine under this config
    pub fn discovery(&self) -> EngineDiscovery {
        match (&self.engine_address, &self.core_props_path) {
            (Some(address), _) => EngineDiscovery::fixed(address.clone()),
            (None, Some(path)) => EngineDiscovery::from_file(path.clone()),
            (None, None) => EngineDiscovery::platform_default(),
        }
    }

    /// Per-request timeout for the display engine
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
