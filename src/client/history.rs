//! Bounded, most-recent-first log of requests sent through the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use crate::http::method::ProxyMethod;

/// How many entries the dashboard keeps.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub method: ProxyMethod,
    pub status_code: u16,
    pub round_trip_ms: u64,
}

impl RequestHistoryEntry {
    pub fn new(method: ProxyMethod, status_code: u16, round_trip: Duration) -> Self {
        Self {
            timestamp: Utc::now(),
            method,
            status_code,
            round_trip_ms: u64::try_from(round_trip.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Newest entry first; the oldest is evicted once capacity is reached.
#[derive(Debug, Clone)]
pub struct RequestHistory {
    entries: VecDeque<RequestHistoryEntry>,
    capacity: usize,
}

impl RequestHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: RequestHistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestHistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&RequestHistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new()
    }
}
