//! Logreport Analytics - filtered log listings and hit charts
//!
//! The report layer of the course log report, built on top of
//! `logreport-store`. It includes:
//!
//! - **Filters**: course, group, user, module, action, date, education
//!   level, origin and free-text search options
//! - **Translator**: turns a filter set into a parameter-bound store
//!   selector, honoring the store's capability flags
//! - **Report**: count plus one ordered page of matching events, or an
//!   unpaginated stream in export mode
//! - **Hits**: distinct-user counts per hour/day/month for the chart
//!
//! # Usage
//!
//! ```ignore
//! use logreport_analytics::{FilterOptions, LogReport, PageState};
//!
//! let filter = FilterOptions::new()
//!     .with_course(5)
//!     .with_user(7)
//!     .with_date(1700000000);
//!
//! let report = LogReport::new(&store);
//! let page = report.fetch(&filter, &PageState::paged(30, 0), &OrderBy::default(), &groups)?;
//! println!("{} of {:?} events", page.rows.len(), page.total);
//! ```

pub mod builder;
pub mod error;
pub mod filter;
pub mod groups;
pub mod hits;
pub mod report;


// Re-exports for convenience
pub use builder::{build_selector, DAY_SECS, SITE_COURSE_ID};
pub use error::{ReportError, Result};
pub use filter::{Action, EduLevel, FilterOptions, OriginFilter};
pub use groups::{GroupLookup, StaticGroups};
pub use hits::{ChartData, HitReporter};
pub use report::{LogReport, PageState, ReportPage};
