//! Paged log report fetch
//!
//! Combines the translator with a store: one count (outside export mode)
//! and exactly one row fetch per request. The set of users referenced on
//! the page is returned as part of the result rather than kept as hidden
//! report state.

use std::collections::BTreeSet;

use logreport_store::{EventReader, LogRecord, OrderBy, Page};

use crate::builder::build_selector;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::groups::GroupLookup;

/// Pagination state supplied by the host table renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// Rows per page
    pub page_size: u64,
    /// First row of the current page (0-based)
    pub page_start: u64,
    /// Export mode: skip counting, stream all matching rows
    pub downloading: bool,
    /// Whether the host wants the initials bar when results span pages
    pub initials_bar: bool,
}

impl PageState {
    /// Regular paginated display
    pub fn paged(page_size: u64, page_start: u64) -> Self {
        Self {
            page_size,
            page_start,
            downloading: false,
            initials_bar: false,
        }
    }

    /// Export mode: every matching row, no count, no pagination
    pub fn downloading() -> Self {
        Self {
            page_size: 0,
            page_start: 0,
            downloading: true,
            initials_bar: false,
        }
    }

    /// Request the initials bar (honored only when results span pages)
    pub fn with_initials_bar(mut self) -> Self {
        self.initials_bar = true;
        self
    }
}

/// One fetched report page
#[derive(Debug, Clone)]
pub struct ReportPage {
    /// Total matching rows; `None` in export mode, where no count is issued
    pub total: Option<u64>,
    /// The rows of this page (all matching rows in export mode)
    pub rows: Vec<LogRecord>,
    /// Users referenced by the rows on this page
    pub users: BTreeSet<i64>,
    /// Whether the initials bar should be shown
    pub initials_bar: bool,
}

/// The filtered, paginated log report
pub struct LogReport<'a> {
    reader: &'a dyn EventReader,
}

impl<'a> LogReport<'a> {
    /// Create a report over a log store
    pub fn new(reader: &'a dyn EventReader) -> Self {
        Self { reader }
    }

    /// Build the selector for the filter and fetch one page
    ///
    /// Outside export mode this issues one count and one row query. In
    /// export mode the count is skipped entirely and all matching rows are
    /// returned in one unpaginated fetch.
    pub fn fetch(
        &self,
        options: &FilterOptions,
        page: &PageState,
        order: &OrderBy,
        groups: &dyn GroupLookup,
    ) -> Result<ReportPage> {
        let capabilities = self.reader.capabilities();
        let selector = build_selector(options, capabilities, groups)?;
        tracing::debug!(
            clauses = selector.clauses().len(),
            downloading = page.downloading,
            "fetching log report page"
        );

        if page.downloading {
            let rows = self.reader.events(&selector, order, Page::all())?;
            let users = users_of(&rows);
            return Ok(ReportPage {
                total: None,
                rows,
                users,
                initials_bar: false,
            });
        }

        let total = self.reader.count_events(&selector)?;
        let window = Page::at(page.page_start, page.page_size);
        let rows = self.reader.events(&selector, order, window)?;
        let users = users_of(&rows);

        Ok(ReportPage {
            total: Some(total),
            rows,
            users,
            initials_bar: page.initials_bar && total > page.page_size,
        })
    }
}

fn users_of(rows: &[LogRecord]) -> BTreeSet<i64> {
    rows.iter().map(|r| r.userid).collect()
}
