//! Event reader trait and paging types
//!
//! The report layer talks to a log store only through [`EventReader`]. The
//! whole system is request-scoped and blocking, so the trait is synchronous;
//! cancellation and timeouts belong to the backend.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::grain::{HitBucket, TimeGrain};
use crate::record::LogRecord;
use crate::selector::{Field, Selector};

/// Capability flags of a log store
///
/// Replaces runtime type inspection of the store ("is this the legacy
/// store?") with explicit flags queried up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// Whether the store records anonymous events. Legacy stores never do,
    /// so the anonymity predicate is redundant there.
    pub supports_anonymous: bool,
    /// Whether the store benefits from the composite (user, module, crud,
    /// edulevel) index. When set, the report forces crud and edulevel
    /// predicates alongside user/module filters.
    pub extended_index: bool,
}

impl StoreCapabilities {
    /// The standard log store: anonymous events, composite index
    pub fn standard() -> Self {
        Self {
            supports_anonymous: true,
            extended_index: true,
        }
    }

    /// The legacy log store: no anonymous events, no composite index
    pub fn legacy() -> Self {
        Self {
            supports_anonymous: false,
            extended_index: false,
        }
    }
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self::standard()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Column ordering for event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            field: Field::TimeCreated,
            direction: SortDirection::Ascending,
        }
    }
}

impl OrderBy {
    /// Order by a field ascending
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Order by a field descending
    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// SQL `ORDER BY` body (without the keyword)
    pub fn sql(&self) -> String {
        format!("{} {}", self.field.column(), self.direction.sql())
    }
}

/// A row window into a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// First row to return (0-based)
    pub start: u64,
    /// Number of rows, `None` for all remaining (export mode)
    pub size: Option<u64>,
}

impl Page {
    /// The first page of a paginated listing
    pub fn first(size: u64) -> Self {
        Self {
            start: 0,
            size: Some(size),
        }
    }

    /// A window starting at `start`
    pub fn at(start: u64, size: u64) -> Self {
        Self {
            start,
            size: Some(size),
        }
    }

    /// Every row, unpaginated
    pub fn all() -> Self {
        Self {
            start: 0,
            size: None,
        }
    }
}

/// Read access to a log store
///
/// One call to [`events`](Self::events) issues exactly one query; callers
/// that need the same window twice must re-issue the call and accept that
/// concurrent writers may have changed the result in between.
pub trait EventReader {
    /// Capability flags of this store
    fn capabilities(&self) -> StoreCapabilities;

    /// Count events matching the selector
    fn count_events(&self, selector: &Selector) -> Result<u64>;

    /// Fetch one window of matching events in the given order
    fn events(&self, selector: &Selector, order: &OrderBy, page: Page) -> Result<Vec<LogRecord>>;

    /// Distinct active users per time bucket since `since`, ascending
    ///
    /// This is the aggregate path for the hit chart; it queries the raw log
    /// directly rather than going through a selector.
    fn hit_counts(&self, grain: TimeGrain, since: DateTime<Utc>) -> Result<Vec<HitBucket>>;
}
