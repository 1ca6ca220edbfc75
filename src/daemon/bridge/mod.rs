//! The native-messaging bridge towards the browser extension. The reader half
//! turns framed stdin into typed signals for the tracker, the writer half
//! frames tracker notifications back onto stdout.

pub mod codec;
pub mod signal;

use std::pin::pin;

use anyhow::Result;
use futures::StreamExt;
use signal::{BrowserSignal, TrackerNotification};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Forwards parsed browser signals into the tracker. When the browser closes
/// the pipe the whole daemon is asked to shut down, there is nothing left to
/// track for.
pub struct SignalReader<R> {
    source: R,
    next: mpsc::Sender<BrowserSignal>,
    shutdown: CancellationToken,
}

impl<R: AsyncRead + Unpin> SignalReader<R> {
    pub fn new(source: R, next: mpsc::Sender<BrowserSignal>, shutdown: CancellationToken) -> Self {
        Self {
            source,
            next,
            shutdown,
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut signals = pin!(codec::signal_stream(self.source));
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                signal = signals.next() => match signal {
                    Some(Ok(signal)) => {
                        debug!("Received signal {signal:?}");
                        if self.next.send(signal).await.is_err() {
                            // Tracker is gone, shutdown is already in motion.
                            return Ok(());
                        }
                    }
                    Some(Err(e)) => {
                        error!("Bridge read failed {e:?}");
                        self.shutdown.cancel();
                        return Err(e);
                    }
                    None => {
                        info!("Browser closed the bridge");
                        self.shutdown.cancel();
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Drains tracker notifications onto the outbound pipe. Ends once the tracker
/// drops its sender during shutdown.
pub struct NotificationWriter<W> {
    sink: W,
    notifications: mpsc::Receiver<TrackerNotification>,
}

impl<W: AsyncWrite + Unpin> NotificationWriter<W> {
    pub fn new(sink: W, notifications: mpsc::Receiver<TrackerNotification>) -> Self {
        Self {
            sink,
            notifications,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(notification) = self.notifications.recv().await {
            debug!("Notifying the popup {notification:?}");
            codec::write_message(&mut self.sink, &notification)
                .await
                .inspect_err(|e| error!("Failed to push a notification {e:?}"))?;
        }
        Ok(())
    }
}
