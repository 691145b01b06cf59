use crate::config::BridgeConfig;
use crate::connection::ZoneFeed;
use crate::engine::DisplayEngine;
use crate::error::Result;
use crate::pipeline::{DisplayPipeline, FrameSink};
use crate::subscription::ZoneEventReceiver;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Runs the whole bridge: find the engine, register, then follow the zone feed
///
/// # Example
///
/// ```no_run
/// use roon_oled_bridge::{Bridge, BridgeConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BridgeConfig::load("config.json")?;
///     Bridge::new(config).run().await?;
///     Ok(())
/// }
/// ```
pub struct Bridge {
    config: BridgeConfig,
}

impl Bridge {
    /// Create a bridge from its configuration
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Run until ctrl-c.
    ///
    /// Only a bad configuration or an unusable HTTP client ends this early;
    /// every other failure is logged and retried.
    pub async fn run(&self) -> Result<()> {
        self.config.validate()?;

        let engine = Arc::new(
            DisplayEngine::discover(
                self.config.discovery(),
                self.config.identity(),
                self.config.request_timeout(),
            )
            .await?,
        );

        if let Err(e) = engine.setup().await {
            tracing::error!("Display engine setup failed: {}", e);
        }

        let mut pipeline = DisplayPipeline::from_config(&self.config, engine);
        tracing::info!("Mirroring zone \"{}\" to display", pipeline.publish_zone());

        tokio::select! {
            _ = self.follow_feed(&mut pipeline) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
            }
        }
        Ok(())
    }

    /// Connect to the feed and process it, reconnecting with backoff forever
    async fn follow_feed<S: FrameSink>(&self, pipeline: &mut DisplayPipeline<S>) {
        let mut backoff = Duration::from_secs(0);

        loop {
            if backoff > Duration::from_secs(0) {
                tracing::info!("Reconnecting to zone feed in {:?}", backoff);
                sleep(backoff).await;
            }

            match ZoneFeed::connect(self.config.feed_url.clone()).await {
                Ok((_feed, mut events)) => {
                    backoff = Duration::from_secs(0);
                    if let Err(e) = process_events(pipeline, &mut events).await {
                        tracing::warn!("Zone feed ended: {}", e);
                    }
                }
                Err(e) => {
                    tracing::error!("Zone feed connection failed: {}", e);
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ... 60s (max)
            if backoff == Duration::from_secs(0) {
                backoff = Duration::from_secs(1);
            } else {
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

/// Feed every event from `events` through `pipeline` until the feed closes.
pub async fn process_events<S: FrameSink>(
    pipeline: &mut DisplayPipeline<S>,
    events: &mut ZoneEventReceiver,
) -> Result<()> {
    loop {
        let event = events.recv().await?;
        pipeline.handle(event);
    }
}
