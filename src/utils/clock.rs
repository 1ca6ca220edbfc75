use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of time for the daemon modules. Having it behind a trait allows the
/// event loops to run on virtual time in tests.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Current wall-clock time.
    fn time(&self) -> DateTime<Utc>;

    /// Current monotonic instant.
    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
