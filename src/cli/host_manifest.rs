use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Name the extension uses to address the native-messaging host.
pub const HOST_NAME: &str = "com.sitewatch.host";

/// The manifest the browser reads to find and launch the daemon.
#[derive(Debug, Serialize)]
struct HostManifest {
    name: &'static str,
    description: &'static str,
    path: PathBuf,
    #[serde(rename = "type")]
    transport: &'static str,
    allowed_origins: Vec<String>,
}

/// Path of the daemon binary, expected to live next to the cli executable.
pub fn daemon_path() -> Result<PathBuf> {
    let mut path = env::current_exe().context("Can't resolve the current executable")?;
    path.set_file_name("sitewatch-daemon");
    #[cfg(windows)]
    {
        path.set_extension("exe");
    }
    Ok(path)
}

fn default_manifest_dir() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        // Windows resolves hosts through the registry. The manifest still
        // needs a location on disk the registry key can point at.
        let appdata = env::var("APPDATA").context("APPDATA should be present on Windows")?;
        Ok(PathBuf::from(appdata).join("sitewatch"))
    }
    #[cfg(not(windows))]
    {
        let home = env::var("HOME").context("Couldn't find HOME")?;
        Ok(PathBuf::from(home).join(".config/google-chrome/NativeMessagingHosts"))
    }
}

/// Writes the host manifest, making the daemon launchable by the browser.
/// Returns the path of the written manifest.
pub fn install(extension_id: &str, manifest_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = manifest_dir.map_or_else(default_manifest_dir, Ok)?;
    std::fs::create_dir_all(&dir)?;

    let manifest = HostManifest {
        name: HOST_NAME,
        description: "Sitewatch website time tracking host",
        path: daemon_path()?,
        transport: "stdio",
        allowed_origins: vec![format!("chrome-extension://{extension_id}/")],
    };

    let path = dir.join(format!("{HOST_NAME}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    Ok(path)
}
