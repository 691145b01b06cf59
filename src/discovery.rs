use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

const MACOS_CORE_PROPS: &str = "/Library/Application Support/SteelSeries Engine 3/coreProps.json";

/// Contents of the engine's `coreProps.json`
#[derive(Debug, Deserialize)]
struct CoreProps {
    address: String,
}

/// Where the display engine's address comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// Read from the engine's address file on every lookup
    File(PathBuf),
    /// Configured address, never changes
    Fixed(String),
    /// No file location on this platform and no override
    Unavailable,
}

/// Locates the display engine's HTTP address
///
/// The engine writes its current `host:port` to a JSON file whenever it
/// starts, so the address can change between engine restarts. Each call to
/// [`EngineDiscovery::locate`] re-reads the file.
///
/// # Example
///
/// ```no_run
/// use roon_oled_bridge::EngineDiscovery;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let discovery = EngineDiscovery::platform_default();
///     let address = discovery.locate_with_backoff(Some(5)).await?;
///     println!("Display engine at {}", address);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EngineDiscovery {
    source: Source,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl EngineDiscovery {
    /// Use the engine's standard address file location for this platform
    pub fn platform_default() -> Self {
        match default_core_props_path() {
            Some(path) => Self::from_file(path),
            None => Self::with_source(Source::Unavailable),
        }
    }

    /// Read the address from a specific file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File(path.into()))
    }

    /// Always report `address`
    pub fn fixed(address: impl Into<String>) -> Self {
        Self::with_source(Source::Fixed(address.into()))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }

    /// Override the retry delays used by [`EngineDiscovery::locate_with_backoff`]
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Look up the current address once
    pub async fn locate(&self) -> Result<String> {
        match &self.source {
            Source::Fixed(address) => Ok(address.clone()),
            Source::Unavailable => Err(BridgeError::NoDiscoveryPath),
            Source::File(path) => {
                let address = read_address(path).await?;
                tracing::info!("Located display engine at address: {}", address);
                Ok(address)
            }
        }
    }

    /// Look up the address, retrying discovery failures with exponential backoff.
    ///
    /// `max_attempts` of `None` retries forever. A platform with no known file
    /// location, and errors other than discovery errors, return immediately.
    pub async fn locate_with_backoff(&self, max_attempts: Option<u32>) -> Result<String> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.locate().await {
                Ok(address) => return Ok(address),
                Err(BridgeError::NoDiscoveryPath) => return Err(BridgeError::NoDiscoveryPath),
                Err(e) if e.is_discovery() && max_attempts.map_or(true, |max| attempt < max) => {
                    tracing::warn!(
                        "Display engine discovery failed (attempt {}): {}; retrying in {:?}",
                        attempt,
                        e,
                        backoff
                    );
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(self.max_backoff);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Read and validate the engine address from `path`
pub async fn read_address(path: &Path) -> Result<String> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BridgeError::DiscoveryFileMissing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let props: CoreProps =
        serde_json::from_str(&raw).map_err(|e| BridgeError::DiscoveryMalformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let address = props.address.trim();
    if address.is_empty() {
        return Err(BridgeError::DiscoveryMalformed {
            path: path.to_path_buf(),
            reason: "empty address".to_string(),
        });
    }

    Ok(address.to_string())
}

/// Where the engine keeps `coreProps.json` on this platform, if anywhere
pub fn default_core_props_path() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        Some(PathBuf::from(MACOS_CORE_PROPS))
    } else if cfg!(target_os = "windows") {
        std::env::var_os("ALLUSERSPROFILE").map(|base| {
            PathBuf::from(base)
                .join("SteelSeries")
                .join("SteelSeries Engine 3")
                .join("coreProps.json")
        })
    } else {
        None
    }
}
