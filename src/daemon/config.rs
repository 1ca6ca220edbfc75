use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use super::tracking::classify::{Classifier, DEFAULT_PRODUCTIVE, DEFAULT_UNPRODUCTIVE};

pub const CONFIG_FILE: &str = "config.toml";

/// Daemon configuration: defaults, overlaid with `config.toml` from the
/// application directory, overlaid with `SITEWATCH_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds without input before the user stops counting as active.
    pub idle_threshold_secs: u32,
    /// Cadence of `session_data_updated` pushes towards the popup, in
    /// accumulated seconds of the active website.
    pub notify_every_secs: u64,
    /// Cadence of periodic snapshot writes, in ticks.
    pub persist_every_secs: u64,
    /// Substrings marking a website as productive.
    pub productive: Vec<String>,
    /// Substrings marking a website as unproductive.
    pub unproductive: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_threshold_secs: 30,
            notify_every_secs: 5,
            persist_every_secs: 15,
            productive: DEFAULT_PRODUCTIVE.map(String::from).to_vec(),
            unproductive: DEFAULT_UNPRODUCTIVE.map(String::from).to_vec(),
        }
    }
}

impl Config {
    pub fn load(app_dir: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(app_dir.join(CONFIG_FILE)))
            .merge(Env::prefixed("SITEWATCH_"))
            .extract()
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(&self.productive, &self.unproductive)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::daemon::tracking::classify::Category;

    use super::{Config, CONFIG_FILE};

    #[test]
    fn defaults_match_the_extension_behavior() {
        let config = Config::default();
        assert_eq!(config.idle_threshold_secs, 30);
        assert_eq!(config.notify_every_secs, 5);
        assert!(config.productive.contains(&"github.com".to_string()));
    }

    #[test]
    fn config_file_overrides_defaults_and_feeds_the_classifier() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "idle_threshold_secs = 60\nproductive = [\"news.ycombinator.com\"]\n",
        )?;

        let config = Config::load(dir.path())?;

        assert_eq!(config.idle_threshold_secs, 60);
        // Untouched keys keep their defaults.
        assert_eq!(config.persist_every_secs, 15);

        let classifier = config.classifier();
        assert_eq!(
            classifier.classify("news.ycombinator.com"),
            Category::Productive
        );
        assert_eq!(classifier.classify("github.com"), Category::Neutral);
        Ok(())
    }
}
