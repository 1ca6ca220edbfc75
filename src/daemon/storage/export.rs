use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::daemon::tracking::{
    classify::{Category, Classifier},
    state::{DailyTotals, SessionMap},
};

use super::snapshot::Snapshot;

/// The on-demand export artifact: everything the tracker knows, in one
/// self-describing json document. Key names match what the popup's export
/// button produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub session_data: SessionMap,
    pub daily_data: DailyTotals,
    pub website_categories: BTreeMap<Arc<str>, Category>,
    /// RFC 3339, so any consumer can parse it back.
    pub timestamp: DateTime<Utc>,
}

impl ExportDocument {
    pub fn build(snapshot: &Snapshot, classifier: &Classifier, timestamp: DateTime<Utc>) -> Self {
        Self {
            session_data: snapshot.sessions.clone(),
            daily_data: snapshot.daily_totals,
            website_categories: classifier.table(),
            timestamp,
        }
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Default export file name, `productivity-data-2024-03-15.json` style.
    pub fn file_name(date: NaiveDate) -> String {
        format!("productivity-data-{}.json", date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::daemon::tracking::{classify::Classifier, domain::Domain, state::TrackerState};

    use super::{ExportDocument, Snapshot};

    fn sample_document() -> ExportDocument {
        let classifier = Classifier::default();
        let mut state = TrackerState::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        state.set_current_domain(Domain::normalize("github.com"), &classifier);
        state.sessions.get_mut(&Domain::normalize("github.com")).unwrap().time = 42;
        state.daily.productive = 42;

        ExportDocument::build(
            &Snapshot::from(&state),
            &classifier,
            Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
        )
    }

    #[test]
    fn document_round_trips_through_json() -> Result<()> {
        let document = sample_document();

        let body = document.to_pretty_json()?;
        let parsed: ExportDocument = serde_json::from_str(&body)?;

        assert_eq!(parsed, document);
        assert_eq!(parsed.session_data, document.session_data);
        Ok(())
    }

    #[test]
    fn document_uses_the_extension_key_names_and_iso_timestamps() -> Result<()> {
        let body = serde_json::to_value(sample_document())?;

        assert_eq!(body["timestamp"], "2024-03-15T18:30:00Z");
        assert_eq!(body["sessionData"]["github.com"]["time"], 42);
        assert_eq!(body["dailyData"]["productive"], 42);
        assert_eq!(body["websiteCategories"]["youtube.com"], "unproductive");
        Ok(())
    }

    #[test]
    fn export_file_name_carries_the_date() {
        assert_eq!(
            ExportDocument::file_name(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
            "productivity-data-2024-03-15.json"
        );
    }
}
