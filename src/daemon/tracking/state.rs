use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    activity::ActivityMonitor,
    classify::{Category, Classifier},
    domain::Domain,
};

/// Accumulated time for one website. `time` is the wire name the snapshot and
/// the popup always used for the seconds counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub time: u64,
    pub category: Category,
}

impl SessionEntry {
    pub fn new(category: Category) -> Self {
        Self { time: 0, category }
    }
}

/// Ordered so snapshots and exports serialize deterministically.
pub type SessionMap = BTreeMap<Domain, SessionEntry>;

/// Seconds accumulated per category for the current calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub productive: u64,
    pub unproductive: u64,
    pub neutral: u64,
}

impl DailyTotals {
    pub fn add(&mut self, category: Category, seconds: u64) {
        match category {
            Category::Productive => self.productive += seconds,
            Category::Unproductive => self.unproductive += seconds,
            Category::Neutral => self.neutral += seconds,
        }
    }

    pub fn total(&self) -> u64 {
        self.productive + self.unproductive + self.neutral
    }

    /// Share of productive time in percent, rounded. 0 when nothing was
    /// tracked yet.
    pub fn productivity_score(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.productive as f64 / total as f64 * 100.).round() as u32
    }
}

/// The authoritative tracker state. Owned by a single module and mutated only
/// through these operations, nothing here is shared or global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    pub enabled: bool,
    pub current_domain: Option<Domain>,
    /// The visible running-timer counter of the popup. Counts every enabled
    /// second, independent of activity and the visited site.
    pub timer_seconds: u64,
    pub sessions: SessionMap,
    pub daily: DailyTotals,
    /// The calendar day `daily` belongs to.
    pub day: NaiveDate,
}

impl TrackerState {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            enabled: false,
            current_domain: None,
            timer_seconds: 0,
            sessions: SessionMap::new(),
            daily: DailyTotals::default(),
            day,
        }
    }

    /// Advances the tracker by one second of wall time. Only accumulates when
    /// tracking is enabled, activity is recent and a website is current, and
    /// is a no-op otherwise. Returns the advanced domain together with its
    /// updated counter.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        classifier: &Classifier,
        activity: &ActivityMonitor,
    ) -> Option<(Domain, u64)> {
        self.roll_day(now.date_naive());

        if !self.enabled {
            return None;
        }
        self.timer_seconds += 1;

        if !activity.is_active(now) {
            return None;
        }
        let domain = self.current_domain.clone()?;

        let entry = self
            .sessions
            .entry(domain.clone())
            .or_insert_with(|| SessionEntry::new(classifier.classify(domain.as_str())));
        entry.time += 1;
        self.daily.add(entry.category, 1);

        Some((domain, entry.time))
    }

    /// Replaces the current website. Counters are neither reset nor merged,
    /// the previous domain simply stops receiving time. The session entry is
    /// created eagerly so the popup can show the category right away.
    pub fn set_current_domain(&mut self, domain: Domain, classifier: &Classifier) {
        self.sessions
            .entry(domain.clone())
            .or_insert_with(|| SessionEntry::new(classifier.classify(domain.as_str())));
        self.current_domain = Some(domain);
    }

    pub fn start(&mut self) {
        self.enabled = true;
    }

    pub fn pause(&mut self) {
        self.enabled = false;
    }

    /// Zeroes the visible timer. Per-domain accumulation survives, only
    /// [TrackerState::clear_sessions] discards it.
    pub fn reset_timer(&mut self) {
        self.timer_seconds = 0;
    }

    /// The explicit full reset: forgets every session entry along with the
    /// daily totals and the timer.
    pub fn clear_sessions(&mut self) {
        self.sessions.clear();
        self.daily = DailyTotals::default();
        self.timer_seconds = 0;
    }

    /// Daily totals only describe a single day. Session entries survive a
    /// rollover, they belong to the browsing session rather than the day.
    fn roll_day(&mut self, today: NaiveDate) {
        if self.day != today {
            self.day = today;
            self.daily = DailyTotals::default();
        }
    }
}
