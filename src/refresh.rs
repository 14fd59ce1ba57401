//! Refresh state for the dashboard: what is on screen, whether a query is in
//! flight, and which completion is allowed to land.

use crate::feeds::{FeedData, Insights, NewsItem};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

pub const FALLBACK_ERROR: &str = "Failed to synchronize with intelligence feeds.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loaded,
    Loading,
    Error,
}

/// Handed out by [`DashboardState::begin`]; the `seq` comes back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    items: Vec<NewsItem>,
    insights: Option<Insights>,
    loading: bool,
    error: Option<String>,
    last_query: Option<String>,
    issued: u64,
    last_synced: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query. Items and insights stay visible until a result lands.
    pub fn begin(&mut self, query: Option<String>) -> RequestTicket {
        let query = query.filter(|q| !q.trim().is_empty());
        self.issued += 1;
        self.loading = true;
        self.error = None;
        self.last_query = query.clone();

        RequestTicket {
            seq: self.issued,
            query,
        }
    }

    /// Apply a finished query, unless a newer one has been issued since.
    pub fn complete(&mut self, seq: u64, data: FeedData) -> Completion {
        if seq != self.issued {
            return Completion::Stale;
        }

        self.loading = false;
        match data {
            FeedData::Batch(batch) => {
                self.items = batch.items;
                self.insights = Some(batch.insights);
                self.error = None;
                self.last_synced = Some(Local::now());
            }
            FeedData::Error(message) => {
                self.error = Some(if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        Completion::Applied
    }

    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else {
            Status::Loaded
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn insights(&self) -> Option<&Insights> {
        self.insights.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// The query a manual retry should re-issue.
    pub fn retry_query(&self) -> Option<String> {
        self.last_query.clone()
    }

    pub fn last_synced(&self) -> Option<DateTime<Local>> {
        self.last_synced
    }
}

/// Fixed-interval refresh clock, polled from the UI loop.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Instant,
}

impl RefreshTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// True once per elapsed interval; re-arms itself when it fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now >= self.next_due {
            self.next_due = now + self.interval;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{Category, NewsBatch, ThreatLevel};

    fn item(id: &str) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("title {}", id),
            summary: String::new(),
            source: "src".to_string(),
            url: "http://a".to_string(),
            published_at: String::new(),
            category: Category::General,
            relevance_score: 10.0,
            sentiment: None,
            keywords: Vec::new(),
        }
    }

    fn batch(ids: &[&str], level: ThreatLevel) -> FeedData {
        FeedData::Batch(NewsBatch {
            items: ids.iter().map(|id| item(id)).collect(),
            insights: Insights {
                threat_level: level,
                ..Insights::default()
            },
        })
    }

    #[test]
    fn test_begin_enters_loading_and_clears_error() {
        let mut state = DashboardState::new();
        let ticket = state.begin(None);
        state.complete(ticket.seq, FeedData::Error("boom".to_string()));
        assert_eq!(state.status(), Status::Error);

        let ticket = state.begin(Some("Global Policy".to_string()));
        assert_eq!(ticket.seq, 2);
        assert_eq!(ticket.query.as_deref(), Some("Global Policy"));
        assert_eq!(state.status(), Status::Loading);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_success_replaces_wholesale() {
        let mut state = DashboardState::new();
        let t1 = state.begin(None);
        state.complete(t1.seq, batch(&["a", "b"], ThreatLevel::High));

        let t2 = state.begin(None);
        assert_eq!(state.items().len(), 2, "items stay visible while loading");
        let applied = state.complete(t2.seq, batch(&["c"], ThreatLevel::Low));

        assert_eq!(applied, Completion::Applied);
        assert_eq!(state.status(), Status::Loaded);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].id, "c");
        assert_eq!(state.insights().unwrap().threat_level, ThreatLevel::Low);
        assert!(state.last_synced().is_some());
    }

    #[test]
    fn test_failure_preserves_previous_data() {
        let mut state = DashboardState::new();
        let t1 = state.begin(None);
        state.complete(t1.seq, batch(&["a"], ThreatLevel::Critical));

        let t2 = state.begin(Some("0-Day Advisories".to_string()));
        state.complete(t2.seq, FeedData::Error("network unreachable".to_string()));

        assert_eq!(state.status(), Status::Error);
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("network unreachable"));
        assert_eq!(state.items().len(), 1);
        assert_eq!(
            state.insights().unwrap().threat_level,
            ThreatLevel::Critical
        );
    }

    #[test]
    fn test_blank_error_uses_fallback() {
        let mut state = DashboardState::new();
        let ticket = state.begin(None);
        state.complete(ticket.seq, FeedData::Error("  ".to_string()));
        assert_eq!(state.error(), Some(FALLBACK_ERROR));
    }

    #[test]
    fn test_stale_completion_discarded() {
        let mut state = DashboardState::new();
        let slow = state.begin(Some("Ransomware Trends".to_string()));
        let fast = state.begin(Some("Global Policy".to_string()));

        assert_eq!(
            state.complete(fast.seq, batch(&["new"], ThreatLevel::Moderate)),
            Completion::Applied
        );
        assert_eq!(
            state.complete(slow.seq, batch(&["old"], ThreatLevel::Critical)),
            Completion::Stale
        );

        assert_eq!(state.items()[0].id, "new");
        assert_eq!(state.insights().unwrap().threat_level, ThreatLevel::Moderate);
    }

    #[test]
    fn test_stale_completion_keeps_loading() {
        let mut state = DashboardState::new();
        let first = state.begin(None);
        let _second = state.begin(None);
        state.complete(first.seq, FeedData::Error("late".to_string()));
        assert_eq!(state.status(), Status::Loading);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_retry_reissues_last_query() {
        let mut state = DashboardState::new();
        let ticket = state.begin(Some("Semiconductor Supply".to_string()));
        state.complete(ticket.seq, FeedData::Error("timeout".to_string()));
        assert_eq!(state.retry_query().as_deref(), Some("Semiconductor Supply"));

        state.begin(Some("   ".to_string()));
        assert_eq!(state.retry_query(), None);
    }

    #[test]
    fn test_dismiss_error() {
        let mut state = DashboardState::new();
        let ticket = state.begin(None);
        state.complete(ticket.seq, FeedData::Error("x".to_string()));
        state.dismiss_error();
        assert_eq!(state.status(), Status::Loaded);
    }

    #[test]
    fn test_timer_fires_once_per_interval() {
        let start = Instant::now();
        let interval = Duration::from_secs(900);
        let mut timer = RefreshTimer::new(interval, start);

        assert!(!timer.poll(start));
        assert!(!timer.poll(start + Duration::from_secs(899)));
        assert!(timer.poll(start + interval));
        assert!(!timer.poll(start + interval + Duration::from_secs(1)));
        assert_eq!(
            timer.remaining(start + interval + Duration::from_secs(100)),
            Duration::from_secs(800)
        );
        assert!(timer.poll(start + interval * 2));
    }
}
