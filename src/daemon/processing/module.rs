use anyhow::Result;

use crate::daemon::storage::snapshot::Snapshot;

/// Represents a consumer of tracker snapshots. This should realistically be
/// able to abstract over different sinks: local storage, remote backup.
pub trait UpdateProcessor {
    fn process_next(&mut self, snapshot: Snapshot) -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
