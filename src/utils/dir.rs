use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves the directory holding the snapshot, config and logs.
/// `$XDG_STATE_HOME/sitewatch` (or `$HOME/.local/state/sitewatch`) on Linux,
/// `%APPDATA%\sitewatch` on Windows.
pub fn application_state_dir() -> Result<PathBuf> {
    let mut path = state_root()?;
    path.push("sitewatch");

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

fn state_root() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        env::var("APPDATA")
            .map(PathBuf::from)
            .context("APPDATA should be present on Windows")
    }
    #[cfg(not(windows))]
    {
        if let Ok(state) = env::var("XDG_STATE_HOME") {
            return Ok(PathBuf::from(state));
        }
        let home = env::var("HOME").context("Couldn't find neither XDG_STATE_HOME nor HOME")?;
        let mut path = PathBuf::from(home);
        path.push(".local/state");
        Ok(path)
    }
}
