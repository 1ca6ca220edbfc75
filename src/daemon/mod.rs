use std::path::PathBuf;

use anyhow::Result;
use bridge::{NotificationWriter, SignalReader};
use config::Config;
use processing::{snapshot_save::SnapshotSaver, ProcessingModule};
use storage::snapshot::{Snapshot, SnapshotStorage, SnapshotStorageImpl};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracking::tracker::TrackerModule;

use crate::utils::clock::{Clock, DefaultClock};

pub mod args;
pub mod bridge;
pub mod config;
pub mod processing;
pub mod shutdown;
pub mod storage;
pub mod tracking;

const CHANNEL_BUFFER: usize = 16;

/// Represents the starting point for the daemon. The browser launches the
/// process as its native-messaging host and owns both ends of the pipe.
pub async fn start_daemon(dir: PathBuf, config: Config) -> Result<()> {
    let storage = SnapshotStorageImpl::new(dir)?;
    let shutdown_token = CancellationToken::new();

    run_host(
        tokio::io::stdin(),
        tokio::io::stdout(),
        storage,
        &config,
        shutdown_token,
        DefaultClock,
    )
    .await
}

/// Wires the four cooperating tasks together: bridge reader → tracker →
/// (snapshot processing, bridge writer), everything connected through bounded
/// channels and torn down through one cancellation token.
async fn run_host(
    source: impl AsyncRead + Unpin,
    sink: impl AsyncWrite + Unpin,
    storage: impl SnapshotStorage,
    config: &Config,
    shutdown_token: CancellationToken,
    clock: impl Clock,
) -> Result<()> {
    let (signal_sender, signal_receiver) = mpsc::channel(CHANNEL_BUFFER);
    let (notification_sender, notification_receiver) = mpsc::channel(CHANNEL_BUFFER);
    let (snapshot_sender, snapshot_receiver) = mpsc::channel(CHANNEL_BUFFER);

    let restored = match storage.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Couldn't restore previous state, starting fresh {e:?}");
            Snapshot::default()
        }
    };

    let reader = SignalReader::new(source, signal_sender, shutdown_token.clone());
    let tracker = TrackerModule::new(
        restored,
        config,
        signal_receiver,
        notification_sender,
        snapshot_sender,
        shutdown_token.clone(),
        Box::new(clock),
    );
    let processor = ProcessingModule::new(snapshot_receiver, SnapshotSaver::new(storage));
    let writer = NotificationWriter::new(sink, notification_receiver);

    let (_, reader_result, tracker_result, processing_result, writer_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        reader.run(),
        tracker.run(),
        processor.run(),
        writer.run(),
    );

    if let Err(e) = reader_result {
        error!("Bridge reader got an error {e:?}");
    }
    if let Err(e) = tracker_result {
        error!("Tracker module got an error {e:?}");
    }
    if let Err(e) = processing_result {
        error!("Processing module got an error {e:?}");
    }
    if let Err(e) = writer_result {
        error!("Bridge writer got an error {e:?}");
    }

    Ok(())
}
