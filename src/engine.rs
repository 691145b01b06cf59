use crate::discovery::EngineDiscovery;
use crate::error::{BridgeError, Result};
use crate::frame::DisplayFrame;
use crate::pipeline::FrameSink;
use crate::protocol::{Endpoint, GameIdentity};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default timeout for a single request to the display engine
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the GameSense display engine
///
/// Holds the engine's current address and re-reads it from discovery when a
/// publish fails, since the engine picks a new port each time it restarts.
/// Publishing is fire-and-forget: a failed frame is dropped and the next one
/// goes to the refreshed address.
///
/// # Example
///
/// ```no_run
/// use roon_oled_bridge::{DisplayEngine, EngineDiscovery, GameIdentity};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let identity = GameIdentity {
///         game: "SVHROON".into(),
///         event: "NOWPLAYING".into(),
///         display_name: "Roon Display Song".into(),
///         developer: "me".into(),
///     };
///     let engine = DisplayEngine::discover(
///         EngineDiscovery::platform_default(),
///         identity,
///         Duration::from_secs(10),
///     )
///     .await?;
///     engine.setup().await?;
///     Ok(())
/// }
/// ```
pub struct DisplayEngine {
    client: reqwest::Client,
    address: RwLock<String>,
    discovery: EngineDiscovery,
    identity: GameIdentity,
}

impl DisplayEngine {
    /// Create an engine client for a known address
    pub fn new(
        address: impl Into<String>,
        discovery: EngineDiscovery,
        identity: GameIdentity,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            address: RwLock::new(address.into()),
            discovery,
            identity,
        })
    }

    /// Locate the engine, retrying until it shows up, and create a client for it
    pub async fn discover(
        discovery: EngineDiscovery,
        identity: GameIdentity,
        request_timeout: Duration,
    ) -> Result<Self> {
        let address = discovery.locate_with_backoff(None).await?;
        Self::new(address, discovery, identity, request_timeout)
    }

    /// The address requests currently go to
    pub fn address(&self) -> String {
        self.address
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Game identity this client registers
    pub fn identity(&self) -> &GameIdentity {
        &self.identity
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("http://{}/{}", self.address(), endpoint.path())
    }

    async fn post<T: Serialize>(&self, endpoint: Endpoint, body: &T) -> Result<()> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::HttpStatus {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Declare the game to the engine
    pub async fn register_game(&self) -> Result<()> {
        self.post(Endpoint::GameMetadata, &self.identity.metadata())
            .await?;
        tracing::info!("Registered game {} with display engine", self.identity.game);
        Ok(())
    }

    /// Bind the now-playing event and its screen layout
    pub async fn bind_event(&self) -> Result<()> {
        self.post(Endpoint::BindGameEvent, &self.identity.bind_now_playing())
            .await?;
        tracing::info!(
            "Bound event {} for game {}",
            self.identity.event,
            self.identity.game
        );
        Ok(())
    }

    /// Remove the game and everything bound to it
    pub async fn remove_game(&self) -> Result<()> {
        self.post(Endpoint::RemoveGame, &self.identity.remove()).await?;
        tracing::info!("Removed game {} from display engine", self.identity.game);
        Ok(())
    }

    /// Register the game and bind its event. Safe to repeat.
    pub async fn register(&self) -> Result<()> {
        self.register_game().await?;
        self.bind_event().await
    }

    /// Probe that the game is registered by sending a placeholder frame.
    ///
    /// If the probe fails the game is removed and registered again, once.
    pub async fn send_heartbeat(&self) -> Result<()> {
        match self
            .post(Endpoint::GameEvent, &self.identity.loading_event())
            .await
        {
            Ok(()) => {
                tracing::info!("Display engine accepted test event");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Test event failed, re-registering game: {}", e);
                if let Err(e) = self.remove_game().await {
                    tracing::warn!("Failed to remove game: {}", e);
                }
                self.register().await
            }
        }
    }

    /// Startup sequence: register, bind and probe
    pub async fn setup(&self) -> Result<()> {
        if let Err(e) = self.register().await {
            tracing::error!("Failed to register with display engine: {}", e);
        }
        self.send_heartbeat().await
    }

    /// Send one frame.
    ///
    /// On failure the frame is dropped and the engine address is looked up
    /// again for later publishes.
    pub async fn publish(&self, frame: &DisplayFrame) -> Result<()> {
        match self
            .post(Endpoint::GameEvent, &self.identity.frame_event(frame))
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to publish frame: {}", e);
                self.rediscover().await;
                Err(e)
            }
        }
    }

    /// Publish on a background task and hand back its result
    pub fn spawn_publish(self: &Arc<Self>, frame: DisplayFrame) -> JoinHandle<Result<()>> {
        let engine = self.clone();
        tokio::spawn(async move { engine.publish(&frame).await })
    }

    /// Re-read the engine address. Keeps the old address if lookup fails.
    pub async fn rediscover(&self) {
        match self.discovery.locate().await {
            Ok(address) => {
                let mut current = self.address.write().unwrap_or_else(|e| e.into_inner());
                if *current != address {
                    tracing::info!("Display engine moved from {} to {}", current, address);
                    *current = address;
                }
            }
            Err(e) => tracing::warn!("Display engine rediscovery failed: {}", e),
        }
    }
}

impl FrameSink for Arc<DisplayEngine> {
    fn submit(&self, frame: DisplayFrame) {
        // Errors are logged by publish; nothing waits on the result.
        drop(self.spawn_publish(frame));
    }
}
