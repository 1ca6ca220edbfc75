//!  Persistence of the tracker. The whole state fits in a single key-value
//!  snapshot, stored as one json file through [snapshot::SnapshotStorageImpl],
//!  plus the on-demand [export::ExportDocument] artifact.

pub mod export;
pub mod snapshot;
