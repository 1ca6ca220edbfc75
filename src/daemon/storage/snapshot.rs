use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::warn;

use crate::daemon::tracking::{
    domain::Domain,
    state::{DailyTotals, SessionMap, TrackerState},
};

pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// The persisted key-value snapshot of the tracker. Field names stay
/// camelCase so the file is interchangeable with what the extension kept in
/// browser storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub enabled: bool,
    pub current_domain: Option<Domain>,
    pub timer_seconds: u64,
    pub day: NaiveDate,
    pub sessions: SessionMap,
    pub daily_totals: DailyTotals,
}

impl From<&TrackerState> for Snapshot {
    fn from(state: &TrackerState) -> Self {
        Snapshot {
            enabled: state.enabled,
            current_domain: state.current_domain.clone(),
            timer_seconds: state.timer_seconds,
            day: state.day,
            sessions: state.sessions.clone(),
            daily_totals: state.daily,
        }
    }
}

impl From<Snapshot> for TrackerState {
    fn from(snapshot: Snapshot) -> Self {
        TrackerState {
            enabled: snapshot.enabled,
            current_domain: snapshot.current_domain,
            timer_seconds: snapshot.timer_seconds,
            day: snapshot.day,
            sessions: snapshot.sessions,
            daily: snapshot.daily_totals,
        }
    }
}

/// Interface for abstracting persistence of the snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStorage: Send + Sync + 'static {
    /// Restores the last snapshot. Absent or unreadable state loads as the
    /// defaults, persistence is best-effort in both directions.
    async fn load(&self) -> Result<Snapshot>;

    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Snapshot storage on top of a single json file, guarded with advisory file
/// locks so the cli can read while the daemon writes.
pub struct SnapshotStorageImpl {
    path: PathBuf,
}

impl SnapshotStorageImpl {
    pub fn new(state_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&state_dir)?;

        Ok(Self {
            path: state_dir.join(SNAPSHOT_FILE),
        })
    }

    async fn read_contents(&self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut contents = String::new();
        let result = file.read_to_string(&mut contents).await;
        file.unlock_async().await?;
        result?;

        Ok(Some(contents))
    }
}

#[async_trait]
impl SnapshotStorage for SnapshotStorageImpl {
    async fn load(&self) -> Result<Snapshot> {
        let Some(contents) = self.read_contents().await? else {
            return Ok(Snapshot::default());
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                // Might happen after a shutdown cutting off a write. Treated
                // as no prior state.
                warn!("Snapshot at {:?} is corrupted, starting over: {e}", self.path);
                Ok(Snapshot::default())
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for the file, mirrored by the shared
        // lock on the read side.
        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, snapshot).await;
        file.unlock_async().await?;
        result
    }
}

impl SnapshotStorageImpl {
    async fn overwrite(file: &mut File, snapshot: &Snapshot) -> Result<()> {
        file.set_len(0).await?;
        let body = serde_json::to_vec(snapshot)?;
        file.write_all(&body).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::daemon::tracking::{
        classify::Classifier,
        domain::Domain,
        state::{SessionEntry, TrackerState},
    };

    use super::{Snapshot, SnapshotStorage, SnapshotStorageImpl, SNAPSHOT_FILE};

    fn sample_snapshot() -> Snapshot {
        let classifier = Classifier::default();
        let mut state = TrackerState::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        state.start();
        state.set_current_domain(Domain::normalize("github.com"), &classifier);
        state.set_current_domain(Domain::normalize("youtube.com"), &classifier);
        state.sessions.get_mut(&Domain::normalize("github.com")).unwrap().time = 90;
        state.sessions.get_mut(&Domain::normalize("youtube.com")).unwrap().time = 15;
        state.timer_seconds = 105;
        Snapshot::from(&state)
    }

    #[tokio::test]
    async fn snapshots_round_trip_identically() -> Result<()> {
        let dir = tempdir()?;
        let storage = SnapshotStorageImpl::new(dir.path().to_path_buf())?;

        let snapshot = sample_snapshot();
        storage.save(&snapshot).await?;
        let restored = storage.load().await?;

        assert_eq!(restored, snapshot);
        assert_eq!(restored.sessions, snapshot.sessions);
        Ok(())
    }

    #[tokio::test]
    async fn missing_snapshot_loads_as_defaults() -> Result<()> {
        let dir = tempdir()?;
        let storage = SnapshotStorageImpl::new(dir.path().to_path_buf())?;

        let snapshot = storage.load().await?;

        assert_eq!(snapshot, Snapshot::default());
        assert!(!snapshot.enabled);
        assert!(snapshot.sessions.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_snapshot_loads_as_defaults() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "{\"enabled\": tru")?;
        let storage = SnapshotStorageImpl::new(dir.path().to_path_buf())?;

        assert_eq!(storage.load().await?, Snapshot::default());
        Ok(())
    }

    #[tokio::test]
    async fn saving_twice_keeps_the_latest_state_only() -> Result<()> {
        let dir = tempdir()?;
        let storage = SnapshotStorageImpl::new(dir.path().to_path_buf())?;

        let mut snapshot = sample_snapshot();
        storage.save(&snapshot).await?;
        snapshot.sessions.insert(
            Domain::normalize("example.org"),
            SessionEntry::new(crate::daemon::tracking::classify::Category::Neutral),
        );
        snapshot.enabled = false;
        storage.save(&snapshot).await?;

        assert_eq!(storage.load().await?, snapshot);
        Ok(())
    }

    #[test]
    fn wire_format_uses_the_extension_key_names() {
        let body = serde_json::to_value(sample_snapshot()).unwrap();
        assert!(body.get("currentDomain").is_some());
        assert!(body.get("dailyTotals").is_some());
        assert!(body.get("timerSeconds").is_some());
        assert_eq!(
            body["sessions"]["github.com"]["time"],
            serde_json::json!(90)
        );
        assert_eq!(
            body["sessions"]["github.com"]["category"],
            serde_json::json!("productive")
        );
    }
}
