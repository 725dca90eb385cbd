//! Logreport Store - log event storage access for the course log report
//!
//! Provides a unified interface for querying course event logs from multiple
//! backends:
//!
//! - **SQL**: the production log table, reached through an external
//!   [`SqlExecutor`] that owns connection handling and parameter binding
//! - **Memory**: an in-process record list for development and tests
//!
//! # Overview
//!
//! The central type is the [`Selector`]: an ordered set of structured filter
//! clauses that renders to a parameter-bound `WHERE` fragment for the SQL
//! backend and evaluates directly against [`LogRecord`]s for the memory
//! backend. Both paths share the same semantics, so behaviour verified
//! against the memory backend holds for the generated SQL.
//!
//! # Usage
//!
//! ```ignore
//! use logreport_store::{EventReader, MemoryStore, Selector, Clause, Field, Page};
//!
//! let store = MemoryStore::standard(records);
//! let mut selector = Selector::new();
//! selector.push(Clause::eq(Field::CourseId, 5));
//!
//! let total = store.count_events(&selector)?;
//! let rows = store.events(&selector, &OrderBy::default(), Page::first(30))?;
//! ```

pub mod error;
pub mod grain;
pub mod memory;
pub mod reader;
pub mod record;
pub mod selector;
pub mod sql;

#[cfg(test)]
mod memory_test;
#[cfg(test)]
mod selector_test;

// Re-exports for convenience
pub use error::{Result, StoreError};
pub use grain::{HitBucket, TimeGrain};
pub use memory::MemoryStore;
pub use reader::{EventReader, OrderBy, Page, SortDirection, StoreCapabilities};
pub use record::LogRecord;
pub use selector::{Clause, Field, Selector, SqlQuery, Value, CONTEXT_MODULE};
pub use sql::{SqlEventReader, SqlExecutor, SqlParams};
