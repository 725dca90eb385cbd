//! Hit aggregation for the report chart
//!
//! Three fixed views of the same aggregate: distinct users per hour over
//! the last day, per day over the last 30 days, and per month over the
//! last 365 days. Each view is one independent query against the store's
//! aggregate path.

use chrono::Utc;
use serde::Serialize;

use logreport_store::{EventReader, HitBucket, TimeGrain};

use crate::error::{ReportError, Result};

/// Chart-ready hit data for all three grains
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub hourly: Vec<HitBucket>,
    pub daily: Vec<HitBucket>,
    pub monthly: Vec<HitBucket>,
}

/// Aggregate hit reporter
pub struct HitReporter<'a> {
    reader: &'a dyn EventReader,
}

impl<'a> HitReporter<'a> {
    /// Create a reporter over a log store
    pub fn new(reader: &'a dyn EventReader) -> Self {
        Self { reader }
    }

    /// Distinct-user hits per bucket for one grain, ascending by time
    pub fn get_hits(&self, grain: TimeGrain) -> Result<Vec<HitBucket>> {
        let since = Utc::now() - grain.lookback();
        tracing::debug!(grain = grain.name(), since = since.timestamp(), "aggregating hits");
        Ok(self.reader.hit_counts(grain, since)?)
    }

    /// Like [`get_hits`](Self::get_hits), from a duration name
    ///
    /// Unknown names ("weekly", ...) fail with an explicit error rather
    /// than producing an unconstrained query.
    pub fn get_hits_named(&self, duration: &str) -> Result<Vec<HitBucket>> {
        let grain = TimeGrain::parse(duration)
            .map_err(|_| ReportError::InvalidDuration(duration.to_string()))?;
        self.get_hits(grain)
    }

    /// Run all three grains for the chart
    pub fn chart_data(&self) -> Result<ChartData> {
        Ok(ChartData {
            hourly: self.get_hits(TimeGrain::Hourly)?,
            daily: self.get_hits(TimeGrain::Daily)?,
            monthly: self.get_hits(TimeGrain::Monthly)?,
        })
    }
}
