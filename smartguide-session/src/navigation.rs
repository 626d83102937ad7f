//! Navigation hand-off: directions link construction and launching

use crate::config::NavigationConfig;
use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Travel mode understood by the maps link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Transit,
}

/// Transport choices offered on the manual path.
pub const TRANSPORT_CHOICES: [&str; 3] = ["走路", "公車", "捷運"];

impl TransportMode {
    /// Map a spoken or selected transport to a travel mode; anything
    /// unrecognised is walking.
    pub fn from_spoken(transport: &str) -> Self {
        match transport.trim().to_lowercase().as_str() {
            "公車" | "捷運" | "bus" | "metro" | "mrt" | "transit" => TransportMode::Transit,
            _ => TransportMode::Walking,
        }
    }

    pub fn travel_mode(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.travel_mode())
    }
}

/// Directions link for `destination` by `transport`, appended to `base`.
pub fn build_maps_url(base: &str, destination: &str, transport: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("destination", destination)
        .append_pair("travelmode", TransportMode::from_spoken(transport).travel_mode());
    Ok(url)
}

/// Opens a navigation link for the user.
pub trait NavigationLauncher: Send + Sync {
    fn launch(&self, url: &Url) -> Result<()>;

    fn name(&self) -> &str;
}

/// Opens links in the platform's default browser.
#[derive(Debug, Default)]
pub struct SystemBrowserLauncher;

impl NavigationLauncher for SystemBrowserLauncher {
    fn launch(&self, url: &Url) -> Result<()> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = std::process::Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else if cfg!(target_os = "macos") {
            std::process::Command::new("open")
        } else {
            std::process::Command::new("xdg-open")
        };

        cmd.arg(url.as_str());
        spawn_reaped(cmd)
            .map_err(|e| SessionError::Navigation(format!("Failed to open browser: {}", e)))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "browser"
    }
}

/// Spawn `cmd` detached from stdio; a background thread waits on the child
/// so it does not linger as a zombie.
fn spawn_reaped(
    mut cmd: std::process::Command,
) -> std::io::Result<std::thread::JoinHandle<Option<std::process::ExitStatus>>> {
    let mut child = cmd
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                warn!("Browser launcher exited with {}", status);
            }
            Some(status)
        }
        Err(e) => {
            warn!("Failed to wait for browser launcher: {}", e);
            None
        }
    }))
}

/// Only logs the link.
#[derive(Debug, Default)]
pub struct NullLauncher;

impl NavigationLauncher for NullLauncher {
    fn launch(&self, url: &Url) -> Result<()> {
        info!("Navigation link (not opened): {}", url);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Builds directions links and hands them to a launcher.
#[derive(Clone)]
pub struct Navigator {
    base_url: String,
    launcher: Arc<dyn NavigationLauncher>,
}

impl Navigator {
    pub fn new(config: &NavigationConfig, launcher: Arc<dyn NavigationLauncher>) -> Result<Self> {
        config.validate().map_err(SessionError::Navigation)?;
        Ok(Self {
            base_url: config.base_url.clone(),
            launcher,
        })
    }

    /// Launcher chosen by `open_browser`.
    pub fn from_config(config: &NavigationConfig) -> Result<Self> {
        let launcher: Arc<dyn NavigationLauncher> = if config.open_browser {
            Arc::new(SystemBrowserLauncher)
        } else {
            Arc::new(NullLauncher)
        };
        Self::new(config, launcher)
    }

    pub fn url_for(&self, destination: &str, transport: &str) -> Result<Url> {
        build_maps_url(&self.base_url, destination, transport)
    }

    /// Build the link and launch it. A launch failure is logged, not returned.
    pub fn open(&self, destination: &str, transport: &str) -> Result<Url> {
        let url = self.url_for(destination, transport)?;
        match self.launcher.launch(&url) {
            Ok(()) => info!("Opened navigation via {}: {}", self.launcher.name(), url),
            Err(e) => warn!("Could not open navigation link {}: {}", url, e),
        }
        Ok(url)
    }
}
