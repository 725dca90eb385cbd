//! In-memory log store backend
//!
//! Holds records in a `Vec` and evaluates selectors directly. Used for
//! local development and tests; semantics mirror the SQL backend.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::Result;
use crate::grain::{HitBucket, TimeGrain};
use crate::reader::{EventReader, OrderBy, Page, SortDirection, StoreCapabilities};
use crate::record::LogRecord;
use crate::selector::Selector;

/// In-memory event store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<LogRecord>,
    capabilities: StoreCapabilities,
}

impl MemoryStore {
    /// Create a store with standard capabilities
    pub fn standard(records: Vec<LogRecord>) -> Self {
        Self {
            records,
            capabilities: StoreCapabilities::standard(),
        }
    }

    /// Create a store with legacy capabilities
    pub fn legacy(records: Vec<LogRecord>) -> Self {
        Self {
            records,
            capabilities: StoreCapabilities::legacy(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = &'a LogRecord> {
        self.records.iter().filter(|r| selector.matches(r))
    }
}

impl EventReader for MemoryStore {
    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    fn count_events(&self, selector: &Selector) -> Result<u64> {
        Ok(self.matching(selector).count() as u64)
    }

    fn events(&self, selector: &Selector, order: &OrderBy, page: Page) -> Result<Vec<LogRecord>> {
        let mut rows: Vec<LogRecord> = self.matching(selector).cloned().collect();
        rows.sort_by(|a, b| {
            let ordering = a.value(order.field).cmp(&b.value(order.field));
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let start = page.start.min(rows.len() as u64) as usize;
        let end = match page.size {
            Some(size) => (start as u64 + size).min(rows.len() as u64) as usize,
            None => rows.len(),
        };
        Ok(rows[start..end].to_vec())
    }

    fn hit_counts(&self, grain: TimeGrain, since: DateTime<Utc>) -> Result<Vec<HitBucket>> {
        // bucket start -> distinct userids
        let mut buckets: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();

        for record in &self.records {
            if record.timecreated <= since.timestamp() {
                continue;
            }
            let created = match Utc.timestamp_opt(record.timecreated, 0).single() {
                Some(dt) => dt,
                None => continue,
            };
            let bucket = grain.truncate(created).timestamp();
            buckets.entry(bucket).or_default().insert(record.userid);
        }

        Ok(buckets
            .into_iter()
            .map(|(bucket, users)| {
                let label = Utc
                    .timestamp_opt(bucket, 0)
                    .single()
                    .map(|dt| grain.label(dt))
                    .unwrap_or_default();
                HitBucket {
                    bucket,
                    label,
                    users: users.len() as u64,
                }
            })
            .collect())
    }
}
