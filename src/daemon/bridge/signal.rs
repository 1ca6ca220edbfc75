use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::daemon::tracking::{domain::Domain, state::SessionMap};

/// Message sent by the extension into the daemon. The wire format keeps the
/// `action` tag and snake_case names the content script and popup already
/// speak, timestamps travel as unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BrowserSignal {
    UserActive {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        timestamp: DateTime<Utc>,
    },
    UserInactive {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        timestamp: DateTime<Utc>,
    },
    StartTracking,
    PauseTracking,
    ResetTimer,
    ClearSessions,
    /// Carries whatever the tab handed over, a full url or a bare domain.
    /// Normalization happens on receipt.
    WebsiteChanged { website: String },
}

/// Message pushed back to the popup. Delivery is best-effort, a popup that
/// isn't open simply misses the update and catches up on the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TrackerNotification {
    WebsiteChanged { website: Domain },
    SessionDataUpdated { sessions: SessionMap },
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::BrowserSignal;

    #[test]
    fn signals_parse_the_extension_wire_format() {
        let signal: BrowserSignal =
            serde_json::from_str(r#"{"action":"user_active","timestamp":1710504000000}"#).unwrap();
        assert_eq!(
            signal,
            BrowserSignal::UserActive {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
            }
        );

        let signal: BrowserSignal = serde_json::from_str(r#"{"action":"start_tracking"}"#).unwrap();
        assert_eq!(signal, BrowserSignal::StartTracking);

        let signal: BrowserSignal =
            serde_json::from_str(r#"{"action":"website_changed","website":"https://github.com"}"#)
                .unwrap();
        assert_eq!(
            signal,
            BrowserSignal::WebsiteChanged {
                website: "https://github.com".into()
            }
        );
    }
}
