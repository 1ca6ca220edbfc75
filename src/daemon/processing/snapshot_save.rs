use anyhow::Result;
use tracing::debug;

use crate::daemon::storage::snapshot::{Snapshot, SnapshotStorage};

use super::module::UpdateProcessor;

/// Bridges the tracker's periodic snapshot emissions and [SnapshotStorage].
/// Consecutive identical snapshots are written only once, a paused tracker
/// shouldn't keep the disk spinning.
pub struct SnapshotSaver<S: SnapshotStorage> {
    storage: S,
    last_saved: Option<Snapshot>,
}

impl<S: SnapshotStorage> SnapshotSaver<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            last_saved: None,
        }
    }
}

impl<S: SnapshotStorage> UpdateProcessor for SnapshotSaver<S> {
    async fn process_next(&mut self, snapshot: Snapshot) -> Result<()> {
        if self.last_saved.as_ref() == Some(&snapshot) {
            debug!("Snapshot unchanged, skipping the write");
            return Ok(());
        }

        self.storage.save(&snapshot).await?;
        self.last_saved = Some(snapshot);
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
