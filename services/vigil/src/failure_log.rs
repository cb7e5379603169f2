//! Bounded rolling history of probe failures

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of failures retained per target
pub const FAILURE_LOG_CAPACITY: usize = 100;

/// One recorded probe failure. Field names match the wire format of the
/// status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(rename = "Error")]
    pub reason: String,
    #[serde(rename = "TookMs")]
    pub took_ms: i64,
    #[serde(rename = "StampMs")]
    pub stamp_ms: i64,
}

/// Insertion-ordered ring buffer of recent failures, oldest first.
/// Appending beyond capacity evicts the oldest record.
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    records: VecDeque<FailureRecord>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(FAILURE_LOG_CAPACITY),
        }
    }

    pub fn push(&mut self, record: FailureRecord) {
        if self.records.len() >= FAILURE_LOG_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FailureRecord> {
        self.records.iter()
    }
}
