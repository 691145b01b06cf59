use clap::Parser;
use roon_oled_bridge::{Bridge, BridgeConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Show the track playing in a Roon zone on a SteelSeries OLED screen
#[derive(Debug, Parser)]
#[command(name = "roon-oled-bridge", version, about)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Slug of the zone to mirror (overrides the config file)
    #[arg(short = 'z', long)]
    publish_zone: Option<String>,

    /// WebSocket URL of the zone feed (overrides the config file)
    #[arg(long)]
    feed_url: Option<String>,

    /// Fixed display engine address, skipping discovery
    #[arg(long)]
    engine_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(zone) = args.publish_zone {
        config.publish_zone = zone;
    }
    if let Some(url) = args.feed_url {
        config.feed_url = url;
    }
    if let Some(address) = args.engine_address {
        config.engine_address = Some(address);
    }

    Bridge::new(config).run().await?;
    Ok(())
}
