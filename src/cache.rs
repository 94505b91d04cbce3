//! Single-flight + cooldown cache (spec §5, §9 design note: "a map from
//! siteKey to a shared future-like handle guarded by a mutex; entries are
//! evicted when completed and written through to the persistence
//! collaborator"). Backs the HTTP API layer; the CLI bypasses this entirely
//! (one-shot, no persistence).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify};

use crate::report::ScanReport;

/// One persisted row (spec §6 "Persisted row shape"). Full test results are
/// not kept here; detail endpoints re-scan to populate them.
#[derive(Debug, Clone)]
pub struct PersistedRow {
    pub id: u64,
    pub site_key: String,
    /// Monotonic clock reading, used for cooldown arithmetic.
    pub start_time: Instant,
    /// Wall-clock ISO-8601 timestamp, for display in API responses.
    pub started_at: DateTime<Utc>,
    pub algorithm_version: u32,
    pub grade: Option<&'static str>,
    pub score: Option<i32>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub tests_quantity: usize,
}

impl PersistedRow {
    pub fn from_report(id: u64, report: &ScanReport, start_time: Instant) -> Self {
        PersistedRow {
            id,
            site_key: report.site_key.clone(),
            start_time,
            started_at: Utc::now(),
            algorithm_version: report.algorithm_version,
            grade: report.grade,
            score: report.score,
            status_code: report.status_code,
            error: report.error.clone(),
            tests_passed: report.tests_passed,
            tests_failed: report.tests_failed,
            tests_quantity: report.tests_quantity,
        }
    }

    pub fn age(&self) -> Duration {
        self.start_time.elapsed()
    }
}

enum Slot {
    /// A scan for this siteKey is currently running; waiters subscribe to
    /// `done` and re-check the row once woken.
    InFlight { done: Arc<Notify> },
    /// The most recently completed row for this siteKey.
    Done { row: PersistedRow },
}

/// Per-siteKey single-flight map plus cooldown bookkeeping (spec §5,
/// testable properties 5 and 6).
pub struct ScanCache {
    slots: Mutex<HashMap<String, Slot>>,
    next_id: Mutex<u64>,
}

/// What the caller should do for a given siteKey, decided under the slots
/// lock so the decision and the `InFlight` marker are atomic.
pub enum CacheDecision {
    /// A fresh-enough row exists; return it without scanning.
    UseCached(PersistedRow),
    /// No other caller is scanning this siteKey right now; the caller must
    /// scan and call `complete`/`fail` when done.
    LeadScan,
    /// Another caller is already scanning; wait on the returned `Notify`
    /// and call `decide` again.
    WaitThen(Arc<Notify>),
}

impl Default for ScanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanCache {
    pub fn new() -> Self {
        ScanCache { slots: Mutex::new(HashMap::new()), next_id: Mutex::new(1) }
    }

    /// Decide what a caller asking about `site_key` should do, given a
    /// `max_age` cooldown window.
    pub async fn decide(&self, site_key: &str, max_age: Duration) -> CacheDecision {
        let mut slots = self.slots.lock().await;
        match slots.get(site_key) {
            Some(Slot::Done { row }) if row.age() < max_age => {
                CacheDecision::UseCached(row.clone())
            }
            Some(Slot::InFlight { done }) => CacheDecision::WaitThen(done.clone()),
            _ => {
                slots.insert(
                    site_key.to_string(),
                    Slot::InFlight { done: Arc::new(Notify::new()) },
                );
                CacheDecision::LeadScan
            }
        }
    }

    /// Record a completed scan and wake every waiter blocked on this siteKey.
    pub async fn complete(&self, site_key: &str, report: &ScanReport, start_time: Instant) -> PersistedRow {
        let id = {
            let mut next_id = self.next_id.lock().await;
            let id = *next_id;
            *next_id += 1;
            id
        };
        let row = PersistedRow::from_report(id, report, start_time);

        let mut slots = self.slots.lock().await;
        let previous = slots.insert(site_key.to_string(), Slot::Done { row: row.clone() });
        if let Some(Slot::InFlight { done }) = previous {
            done.notify_waiters();
        }
        row
    }

    /// A scan failed in a way that should not write a cached row (spec §5:
    /// `scan-cancelled` surfaces without writing a cached row). Clears the
    /// in-flight marker and wakes waiters, who will re-enter as the new lead.
    pub async fn abandon(&self, site_key: &str) {
        let mut slots = self.slots.lock().await;
        if let Some(Slot::InFlight { done }) = slots.remove(site_key) {
            done.notify_waiters();
        }
    }

    /// Most recently completed row for `site_key`, regardless of age (used
    /// by `/analyze` to attach history even on a cooldown hit from a
    /// *different* caller's fresh scan).
    pub async fn peek(&self, site_key: &str) -> Option<PersistedRow> {
        let slots = self.slots.lock().await;
        match slots.get(site_key) {
            Some(Slot::Done { row }) => Some(row.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_report(site_key: &str) -> ScanReport {
        ScanReport {
            algorithm_version: 4,
            site_key: site_key.to_string(),
            grade: Some("A+"),
            score: Some(105),
            status_code: Some(200),
            error: None,
            tests_passed: 10,
            tests_failed: 0,
            tests_quantity: 10,
            response_headers: Default::default(),
            tests: Default::default(),
        }
    }

    #[tokio::test]
    async fn first_caller_leads_second_waits() {
        let cache = ScanCache::new();
        match cache.decide("example.test", Duration::from_secs(60)).await {
            CacheDecision::LeadScan => {}
            _ => panic!("expected first caller to lead"),
        }
        match cache.decide("example.test", Duration::from_secs(60)).await {
            CacheDecision::WaitThen(_) => {}
            _ => panic!("expected second caller to wait"),
        }
    }

    #[tokio::test]
    async fn cooldown_returns_cached_row_without_rescan() {
        let cache = ScanCache::new();
        assert!(matches!(
            cache.decide("example.test", Duration::from_secs(60)).await,
            CacheDecision::LeadScan
        ));
        let report = fake_report("example.test");
        cache.complete("example.test", &report, Instant::now()).await;

        match cache.decide("example.test", Duration::from_secs(60)).await {
            CacheDecision::UseCached(row) => assert_eq!(row.site_key, "example.test"),
            _ => panic!("expected cached row within cooldown"),
        }
    }

    #[tokio::test]
    async fn expired_cooldown_leads_a_new_scan() {
        let cache = ScanCache::new();
        cache.decide("example.test", Duration::from_secs(60)).await;
        let report = fake_report("example.test");
        cache.complete("example.test", &report, Instant::now()).await;

        match cache.decide("example.test", Duration::from_millis(0)).await {
            CacheDecision::LeadScan => {}
            _ => panic!("expected cooldown to have expired immediately"),
        }
    }

    #[tokio::test]
    async fn abandon_clears_in_flight_and_allows_new_lead() {
        let cache = ScanCache::new();
        cache.decide("example.test", Duration::from_secs(60)).await;
        cache.abandon("example.test").await;

        match cache.decide("example.test", Duration::from_secs(60)).await {
            CacheDecision::LeadScan => {}
            _ => panic!("expected a fresh lead after abandon"),
        }
    }
}
