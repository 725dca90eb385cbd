//! SQL log store backend
//!
//! Renders selectors and hit aggregates to SQL and delegates execution to an
//! external [`SqlExecutor`], which owns connections, parameter binding and
//! timeouts. Failures from the executor propagate unchanged; nothing is
//! retried here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::grain::{HitBucket, TimeGrain};
use crate::reader::{EventReader, OrderBy, Page, StoreCapabilities};
use crate::record::LogRecord;
use crate::selector::{Selector, Value};

/// Default log table name
pub const LOG_TABLE: &str = "logstore_standard_log";

/// Named parameters for a SQL statement
pub type SqlParams = BTreeMap<String, Value>;

/// External database access layer
///
/// Implemented by the host system's database abstraction. All statements
/// arrive with named `:param` placeholders; the executor is responsible for
/// binding them.
pub trait SqlExecutor {
    /// Run a `SELECT COUNT(...)` statement and return the count
    fn count(&self, sql: &str, params: &SqlParams) -> Result<u64>;

    /// Run a row-returning statement with an offset/limit window
    fn records(
        &self,
        sql: &str,
        params: &SqlParams,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<LogRecord>>;

    /// Run an aggregate statement returning hit buckets
    fn hit_rows(&self, sql: &str, params: &SqlParams) -> Result<Vec<HitBucket>>;
}

/// Log store backed by a SQL table
#[derive(Debug, Clone)]
pub struct SqlEventReader<E> {
    executor: E,
    capabilities: StoreCapabilities,
    table: String,
}

impl<E: SqlExecutor> SqlEventReader<E> {
    /// Create a reader over the standard log table
    pub fn new(executor: E, capabilities: StoreCapabilities) -> Self {
        Self {
            executor,
            capabilities,
            table: LOG_TABLE.to_string(),
        }
    }

    /// Use a different table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// The table this reader queries
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Aggregate SQL for one grain (MySQL dialect)
    ///
    /// Groups on the grain's bucket pattern, counts distinct users and
    /// orders by the earliest event in each bucket. The window bound is the
    /// `:since` parameter.
    pub fn hits_sql(&self, grain: TimeGrain) -> String {
        format!(
            "SELECT MIN(timecreated) AS bucket, \
             DATE_FORMAT(FROM_UNIXTIME(timecreated), '{label}') AS label, \
             COUNT(DISTINCT userid) AS users \
             FROM {table} \
             WHERE timecreated > :since \
             GROUP BY DATE_FORMAT(FROM_UNIXTIME(timecreated), '{group}') \
             ORDER BY bucket ASC",
            label = grain.mysql_label_format(),
            group = grain.mysql_group_format(),
            table = self.table,
        )
    }
}

impl<E: SqlExecutor> EventReader for SqlEventReader<E> {
    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    fn count_events(&self, selector: &Selector) -> Result<u64> {
        let query = selector.to_sql();
        let sql = format!(
            "SELECT COUNT(1) FROM {} WHERE {}",
            self.table, query.where_sql
        );
        tracing::debug!(table = %self.table, sql = %sql, "counting events");
        self.executor.count(&sql, &query.params)
    }

    fn events(&self, selector: &Selector, order: &OrderBy, page: Page) -> Result<Vec<LogRecord>> {
        let query = selector.to_sql();
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY {}",
            self.table,
            query.where_sql,
            order.sql()
        );
        tracing::debug!(
            table = %self.table,
            sql = %sql,
            start = page.start,
            size = ?page.size,
            "fetching events"
        );
        self.executor
            .records(&sql, &query.params, page.start, page.size)
    }

    fn hit_counts(&self, grain: TimeGrain, since: DateTime<Utc>) -> Result<Vec<HitBucket>> {
        let sql = self.hits_sql(grain);
        let mut params = SqlParams::new();
        params.insert("since".to_string(), Value::Int(since.timestamp()));
        tracing::debug!(table = %self.table, grain = grain.name(), sql = %sql, "aggregating hits");
        self.executor.hit_rows(&sql, &params)
    }
}
