use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};

/// Productivity classification of a website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Productive,
    Unproductive,
    Neutral,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Productive => write!(f, "productive"),
            Category::Unproductive => write!(f, "unproductive"),
            Category::Neutral => write!(f, "neutral"),
        }
    }
}

pub const DEFAULT_PRODUCTIVE: [&str; 3] = ["github.com", "stackoverflow.com", "docs.google.com"];
pub const DEFAULT_UNPRODUCTIVE: [&str; 3] = ["youtube.com", "facebook.com", "twitter.com"];

/// Maps domains to categories through two substring allowlists. The
/// productive list is consulted first, the first match wins, everything
/// unmatched is neutral. Total and deterministic, never fails.
#[derive(Debug, Clone)]
pub struct Classifier {
    productive: Vec<Arc<str>>,
    unproductive: Vec<Arc<str>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&DEFAULT_PRODUCTIVE, &DEFAULT_UNPRODUCTIVE)
    }
}

impl Classifier {
    pub fn new(
        productive: impl IntoIterator<Item = impl AsRef<str>>,
        unproductive: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            productive: productive.into_iter().map(|v| v.as_ref().into()).collect(),
            unproductive: unproductive
                .into_iter()
                .map(|v| v.as_ref().into())
                .collect(),
        }
    }

    /// Substring matching mirrors the extension: `youtube.com/watch` is
    /// unproductive even though it isn't a bare hostname.
    pub fn classify(&self, domain: &str) -> Category {
        if self.matches(&self.productive, domain) {
            Category::Productive
        } else if self.matches(&self.unproductive, domain) {
            Category::Unproductive
        } else {
            Category::Neutral
        }
    }

    fn matches(&self, list: &[Arc<str>], domain: &str) -> bool {
        list.iter().any(|site| domain.contains(site.as_ref()))
    }

    /// The full classification table, for the export document.
    pub fn table(&self) -> BTreeMap<Arc<str>, Category> {
        let mut table = BTreeMap::new();
        for site in &self.unproductive {
            table.insert(site.clone(), Category::Unproductive);
        }
        // Productive entries win on overlap, same as classify.
        for site in &self.productive {
            table.insert(site.clone(), Category::Productive);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Classifier};

    #[test]
    fn default_table_matches_the_extension() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("github.com"), Category::Productive);
        assert_eq!(classifier.classify("stackoverflow.com"), Category::Productive);
        assert_eq!(classifier.classify("facebook.com"), Category::Unproductive);
        assert_eq!(classifier.classify("example.org"), Category::Neutral);
    }

    #[test]
    fn classification_works_on_substrings() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("youtube.com/watch"),
            Category::Unproductive
        );
        assert_eq!(
            classifier.classify("gist.github.com"),
            Category::Productive
        );
    }

    #[test]
    fn productive_list_wins_over_unproductive() {
        let classifier = Classifier::new(["docs.example.com"], ["example.com"]);
        assert_eq!(
            classifier.classify("docs.example.com"),
            Category::Productive
        );
        assert_eq!(classifier.classify("example.com"), Category::Unproductive);
    }

    #[test]
    fn table_contains_every_configured_site() {
        let table = Classifier::default().table();
        assert_eq!(table.len(), 6);
        assert_eq!(table["github.com"], Category::Productive);
        assert_eq!(table["twitter.com"], Category::Unproductive);
    }
}
