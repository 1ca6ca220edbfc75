use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::{
    daemon::{
        bridge::signal::{BrowserSignal, TrackerNotification},
        config::Config,
        storage::snapshot::Snapshot,
    },
    utils::clock::Clock,
};

use super::{
    activity::ActivityMonitor, classify::Classifier, domain::Domain, state::TrackerState,
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the tracker state and advances it on a one second cadence while
/// dispatching browser signals in between. Everything the rest of the daemon
/// learns about the state flows out through the notification and snapshot
/// channels.
pub struct TrackerModule {
    signals: mpsc::Receiver<BrowserSignal>,
    notifications: mpsc::Sender<TrackerNotification>,
    snapshots: mpsc::Sender<Snapshot>,
    state: TrackerState,
    classifier: Classifier,
    activity: ActivityMonitor,
    notify_every: u64,
    persist_every: u64,
    ticks: u64,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
}

impl TrackerModule {
    pub fn new(
        restored: Snapshot,
        config: &Config,
        signals: mpsc::Receiver<BrowserSignal>,
        notifications: mpsc::Sender<TrackerNotification>,
        snapshots: mpsc::Sender<Snapshot>,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
    ) -> Self {
        let activity = ActivityMonitor::from_seconds(clock.time(), config.idle_threshold_secs);
        Self {
            signals,
            notifications,
            snapshots,
            state: TrackerState::from(restored),
            classifier: config.classifier(),
            activity,
            notify_every: config.notify_every_secs.max(1),
            persist_every: config.persist_every_secs.max(1),
            ticks: 0,
            shutdown,
            clock,
        }
    }

    /// Executes the tracker event loop. Once the tracker stops, for whatever
    /// reason, the rest of the daemon has nothing left to do.
    pub async fn run(mut self) -> Result<()> {
        let result = self.event_loop().await;
        self.shutdown.cancel();
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut tick_point = self.clock.instant() + TICK_INTERVAL;
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.emit_snapshot().await?;
                    return Ok(());
                }
                _ = self.clock.sleep_until(tick_point) => {
                    tick_point += TICK_INTERVAL;
                    self.on_tick().await?;
                }
                signal = self.signals.recv() => match signal {
                    Some(signal) => self.dispatch(signal).await?,
                    None => {
                        self.emit_snapshot().await?;
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn on_tick(&mut self) -> Result<()> {
        let now = self.clock.time();
        if let Some((domain, seconds)) = self.state.tick(now, &self.classifier, &self.activity) {
            debug!("Advanced {domain} to {seconds}s");
            if seconds % self.notify_every == 0 {
                self.notify(TrackerNotification::SessionDataUpdated {
                    sessions: self.state.sessions.clone(),
                })
                .await?;
            }
        }

        self.ticks += 1;
        if self.ticks % self.persist_every == 0 {
            self.emit_snapshot().await?;
        }
        Ok(())
    }

    /// The single dispatch point for everything the browser sends.
    async fn dispatch(&mut self, signal: BrowserSignal) -> Result<()> {
        debug!("Dispatching signal {signal:?}");
        match signal {
            BrowserSignal::UserActive { timestamp } => self.activity.record_active(timestamp),
            BrowserSignal::UserInactive { timestamp } => self.activity.record_inactive(timestamp),
            BrowserSignal::StartTracking => {
                info!("Tracking started");
                self.state.start();
            }
            BrowserSignal::PauseTracking => {
                info!("Tracking paused");
                self.state.pause();
            }
            BrowserSignal::ResetTimer => {
                self.state.reset_timer();
                self.emit_snapshot().await?;
            }
            BrowserSignal::ClearSessions => {
                info!("Clearing all accumulated sessions");
                self.state.clear_sessions();
                self.emit_snapshot().await?;
                self.notify(TrackerNotification::SessionDataUpdated {
                    sessions: self.state.sessions.clone(),
                })
                .await?;
            }
            BrowserSignal::WebsiteChanged { website } => {
                let domain = Domain::normalize(&website);
                self.state.set_current_domain(domain.clone(), &self.classifier);
                self.emit_snapshot().await?;
                self.notify(TrackerNotification::WebsiteChanged { website: domain })
                    .await?;
            }
        }
        Ok(())
    }

    async fn notify(&self, notification: TrackerNotification) -> Result<()> {
        let span = info_span!("Notifying the presentation layer");
        self.notifications
            .send(notification)
            .instrument(span)
            .await
            .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
        Ok(())
    }

    async fn emit_snapshot(&self) -> Result<()> {
        self.snapshots
            .send(Snapshot::from(&self.state))
            .await
            .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
        Ok(())
    }
}
