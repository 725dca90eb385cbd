//! Filter options for the log report
//!
//! A [`FilterOptions`] value is immutable for the duration of one request;
//! every field is optional and unset fields add no predicate.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// A complete filter for one log report request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Course to restrict to (the site course adds no predicate)
    pub course_id: Option<i64>,
    /// Group whose members to restrict to, when no user filter is set
    pub group_id: Option<i64>,
    /// Single user to restrict to
    pub user_id: Option<i64>,
    /// Activity module (course module context instance) to restrict to
    pub module_id: Option<i64>,
    /// Report action, mapped to the crud column
    pub action: Option<Action>,
    /// Restrict to site error events (error/infected/failed)
    pub site_errors: bool,
    /// Start of a fixed 24h window, epoch seconds
    pub date: Option<i64>,
    /// Education level; unset means any level
    pub edulevel: Option<EduLevel>,
    /// Origin filter; unset means any origin
    pub origin: Option<OriginFilter>,
    /// Free-text substring match on the event name
    pub search: Option<String>,
}

impl FilterOptions {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a course
    pub fn with_course(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Restrict to members of a group
    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Restrict to a user
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to an activity module
    pub fn with_module(mut self, module_id: i64) -> Self {
        self.module_id = Some(module_id);
        self
    }

    /// Restrict to a report action
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Restrict to site error events
    pub fn with_site_errors(mut self) -> Self {
        self.site_errors = true;
        self
    }

    /// Restrict to one day starting at `date` (epoch seconds)
    pub fn with_date(mut self, date: i64) -> Self {
        self.date = Some(date);
        self
    }

    /// Restrict to an education level
    pub fn with_edulevel(mut self, edulevel: EduLevel) -> Self {
        self.edulevel = Some(edulevel);
        self
    }

    /// Restrict to an origin
    pub fn with_origin(mut self, origin: OriginFilter) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Require the event name to contain `text`
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }
}

/// Education level of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EduLevel {
    /// Not pedagogically relevant
    Other = 0,
    /// Teaching activity
    Teaching = 1,
    /// Participating activity
    Participating = 2,
}

impl EduLevel {
    /// All levels, for the forced extended-index predicate
    pub const ALL: [EduLevel; 3] = [Self::Other, Self::Teaching, Self::Participating];

    /// Numeric level as stored in the log table
    pub fn level(&self) -> i64 {
        *self as i64
    }

    /// Parse a numeric level; negative means "any" and is not a level
    pub fn from_level(level: i64) -> Result<Self> {
        match level {
            0 => Ok(Self::Other),
            1 => Ok(Self::Teaching),
            2 => Ok(Self::Participating),
            _ => Err(ReportError::InvalidFilter(format!(
                "unknown education level: {}",
                level
            ))),
        }
    }
}

/// Origin filter for the report
///
/// The report UI offers each concrete origin plus a catch-all entry
/// (historically spelled `---`) matching everything that is not one of the
/// known origins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginFilter {
    /// Match a single origin value
    Exact(String),
    /// Match origins outside {cli, restore, ws, web}
    Other,
}

impl OriginFilter {
    /// The known origin values excluded by [`OriginFilter::Other`]
    pub const KNOWN: [&'static str; 4] = ["cli", "restore", "ws", "web"];

    /// Sentinel the report UI sends for the catch-all entry
    pub const OTHER_SENTINEL: &'static str = "---";

    /// Parse an origin filter from the report UI value
    pub fn parse(s: &str) -> Self {
        if s == Self::OTHER_SENTINEL {
            Self::Other
        } else {
            Self::Exact(s.to_string())
        }
    }
}

/// Report actions, mapped to the crud column of the log table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read events
    View,
    /// Create events
    Create,
    /// Update events
    Update,
    /// Delete events
    Delete,
}

impl Action {
    /// The crud letters, in column order, for the "any action" predicate
    pub const ALL_CRUD: [&'static str; 4] = ["c", "r", "u", "d"];

    /// Parse a report action name
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "add" | "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(ReportError::InvalidFilter(format!("unknown action: {}", s))),
        }
    }

    /// The crud letter this action selects
    pub fn crud(&self) -> &'static str {
        match self {
            Self::View => "r",
            Self::Create => "c",
            Self::Update => "u",
            Self::Delete => "d",
        }
    }
}
