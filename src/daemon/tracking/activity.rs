use chrono::{DateTime, Duration, Utc};

/// Decides whether the user counts as locally active based on the last
/// qualifying input reported by the browser.
///
/// Signals arrive at-least-once and unordered, so both updates are clamped to
/// never contradict fresher information: an activity report only moves
/// `last_activity` forward, an inactivity report only moves it back.
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    last_activity: DateTime<Utc>,
    idle_threshold: Duration,
}

impl ActivityMonitor {
    /// The monitor starts out active as of `start`, matching the extension's
    /// optimistic default before the first signal arrives.
    pub fn from_seconds(start: DateTime<Utc>, threshold_s: u32) -> Self {
        Self {
            last_activity: start,
            idle_threshold: Duration::seconds(threshold_s.into()),
        }
    }

    pub fn record_active(&mut self, timestamp: DateTime<Utc>) {
        self.last_activity = self.last_activity.max(timestamp);
    }

    pub fn record_inactive(&mut self, timestamp: DateTime<Utc>) {
        self.last_activity = self.last_activity.min(timestamp - self.idle_threshold);
    }

    /// Recomputed on demand, once per tick.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity < self.idle_threshold
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::ActivityMonitor;

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn active_strictly_inside_the_threshold() {
        let monitor = ActivityMonitor::from_seconds(start(), 30);

        assert!(monitor.is_active(start() + Duration::seconds(29)));
        assert!(!monitor.is_active(start() + Duration::seconds(30)));
        assert!(!monitor.is_active(start() + Duration::seconds(31)));
    }

    #[test]
    fn activity_extends_the_window() {
        let mut monitor = ActivityMonitor::from_seconds(start(), 30);
        monitor.record_active(start() + Duration::seconds(25));

        assert!(monitor.is_active(start() + Duration::seconds(54)));
        assert!(!monitor.is_active(start() + Duration::seconds(55)));
    }

    #[test]
    fn stale_activity_never_rewinds_the_monitor() {
        let mut monitor = ActivityMonitor::from_seconds(start(), 30);
        monitor.record_active(start() + Duration::seconds(20));
        monitor.record_active(start() + Duration::seconds(5));

        assert!(monitor.is_active(start() + Duration::seconds(49)));
    }

    #[test]
    fn inactivity_forces_the_user_idle() {
        let mut monitor = ActivityMonitor::from_seconds(start(), 30);
        monitor.record_active(start() + Duration::seconds(9));
        monitor.record_inactive(start() + Duration::seconds(10));

        assert!(!monitor.is_active(start() + Duration::seconds(10)));

        // A later activity report takes over again.
        monitor.record_active(start() + Duration::seconds(11));
        assert!(monitor.is_active(start() + Duration::seconds(12)));
    }
}
