//! Click recording and per-code analytics views.
//!
//! The full click history is kept for audit and persistence. Two derived
//! indexes per short code keep the views cheap:
//!
//! * the last UTC day each IP was seen, which drives per-day deduplication
//!   of the mapping's click counter and gives the all-time unique IP count;
//! * a bounded ring of the most recent clicks.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use std::collections::{HashMap, VecDeque};
use tether_core::{AnalyticsReport, ClickEvent, Mapping};
use tracing::trace;

/// How many clicks the recent-clicks view returns.
pub const RECENT_CLICKS: usize = 10;

#[derive(Debug, Clone, Default)]
struct CodeStats {
    /// ip -> latest UTC day a click from it was recorded
    last_seen: HashMap<String, Date>,
    recent: VecDeque<ClickEvent>,
}

/// Records clicks and answers analytics queries.
#[derive(Debug, Clone)]
pub struct ClickAnalytics {
    events: Vec<ClickEvent>,
    per_code: HashMap<String, CodeStats>,
    recent_limit: usize,
}

impl ClickAnalytics {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            per_code: HashMap::new(),
            recent_limit: RECENT_CLICKS,
        }
    }

    /// Rebuilds the derived indexes from a persisted click history.
    ///
    /// Replaying does not produce credits; the mapping counters restored
    /// alongside the history already include them.
    pub fn from_events(events: impl IntoIterator<Item = ClickEvent>) -> Self {
        let mut analytics = Self::new();
        for event in events {
            analytics.record(event);
        }
        analytics
    }

    /// Builds the event for one resolution at `now`.
    pub fn click(
        short_code: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        now: Timestamp,
    ) -> ClickEvent {
        ClickEvent {
            timestamp: now,
            ip: ip.into(),
            user_agent: user_agent.into(),
            short_code: short_code.into(),
        }
    }

    /// Appends `event` to the history and reports whether it earns the
    /// mapping a click credit.
    ///
    /// A click is credited only if it is the first one from its IP for its
    /// short code on its UTC calendar day. A click dated before the latest
    /// day already seen for that IP is never credited.
    pub fn record(&mut self, event: ClickEvent) -> bool {
        let credited = self.would_credit(&event);
        let stats = self.per_code.entry(event.short_code.clone()).or_default();

        if credited {
            stats
                .last_seen
                .insert(event.ip.clone(), utc_day(event.timestamp));
        }

        if stats.recent.len() == self.recent_limit {
            stats.recent.pop_front();
        }
        stats.recent.push_back(event.clone());

        trace!(
            code = %event.short_code,
            ip = %event.ip,
            credited,
            "recorded click"
        );
        self.events.push(event);
        credited
    }

    /// Whether [`record`](Self::record) would credit `event`, without
    /// recording it.
    pub fn would_credit(&self, event: &ClickEvent) -> bool {
        let day = utc_day(event.timestamp);
        let seen = self
            .per_code
            .get(&event.short_code)
            .and_then(|stats| stats.last_seen.get(&event.ip));
        !matches!(seen, Some(&seen) if seen >= day)
    }

    /// Joins the click views for `mapping` with its metadata.
    pub fn report(&self, mapping: &Mapping) -> AnalyticsReport {
        AnalyticsReport {
            short_code: mapping.short_code.clone(),
            original_url: mapping.original_url.clone(),
            total_clicks: mapping.click_count,
            unique_clicks: self.unique_visitors(&mapping.short_code),
            recent_clicks: self.recent(&mapping.short_code),
            created_at: mapping.created_at,
        }
    }

    /// Distinct IPs that ever clicked `code`.
    pub fn unique_visitors(&self, code: &str) -> u64 {
        self.per_code
            .get(code)
            .map_or(0, |stats| stats.last_seen.len() as u64)
    }

    /// The most recent clicks on `code`, oldest first.
    pub fn recent(&self, code: &str) -> Vec<ClickEvent> {
        self.per_code
            .get(code)
            .map(|stats| stats.recent.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every click on `code`, in recording order.
    pub fn history<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ClickEvent> + 'a {
        self.events.iter().filter(move |e| e.short_code == code)
    }

    /// The complete history across all codes.
    pub fn events(&self) -> &[ClickEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for ClickAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

fn utc_day(timestamp: Timestamp) -> Date {
    TimeZone::UTC.to_datetime(timestamp).date()
}
