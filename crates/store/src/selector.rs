//! Structured event selectors
//!
//! A [`Selector`] is an ordered list of filter clauses combined with `AND`.
//! It replaces string-concatenated SQL fragments: every user-supplied value
//! is carried as a bound parameter, so no input can break or extend the
//! rendered query. The same clause list evaluates directly against records
//! for the in-memory backend, keeping both execution paths in agreement.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::LogRecord;

/// Context level of an activity module
pub const CONTEXT_MODULE: i64 = 70;

/// Columns of the log table a selector may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    EventName,
    Component,
    Action,
    Target,
    Crud,
    EduLevel,
    ContextLevel,
    ContextInstanceId,
    CourseId,
    UserId,
    Anonymous,
    Origin,
    TimeCreated,
}

impl Field {
    /// Column name in the log table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::EventName => "eventname",
            Self::Component => "component",
            Self::Action => "action",
            Self::Target => "target",
            Self::Crud => "crud",
            Self::EduLevel => "edulevel",
            Self::ContextLevel => "contextlevel",
            Self::ContextInstanceId => "contextinstanceid",
            Self::CourseId => "courseid",
            Self::UserId => "userid",
            Self::Anonymous => "anonymous",
            Self::Origin => "origin",
            Self::TimeCreated => "timecreated",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer (also carries booleans as 0/1)
    Int(i64),
    /// UTF-8 text
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A single filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `field = value`
    Eq(Field, Value),
    /// `field IN (v1, v2, ...)`
    In(Field, Vec<Value>),
    /// `field NOT IN (v1, v2, ...)`
    NotIn(Field, Vec<Value>),
    /// `(field = v1 OR field = v2 OR ...)`
    AnyOf(Field, Vec<Value>),
    /// `timecreated > after AND timecreated < before` (both exclusive)
    TimeBetween { after: i64, before: i64 },
    /// Case-sensitive substring match on a text field
    Contains(Field, String),
    /// Matches no rows; stands in for an empty IN-list
    Never,
}

impl Clause {
    /// Shorthand for an equality clause
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Clause::Eq(field, value.into())
    }

    /// Does this clause hold for the given record?
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Clause::Eq(field, value) => record.value(*field) == *value,
            Clause::In(field, values) | Clause::AnyOf(field, values) => {
                values.contains(&record.value(*field))
            }
            Clause::NotIn(field, values) => !values.contains(&record.value(*field)),
            Clause::TimeBetween { after, before } => {
                record.timecreated > *after && record.timecreated < *before
            }
            Clause::Contains(field, needle) => match record.value(*field) {
                Value::Text(text) => text.contains(needle),
                Value::Int(_) => false,
            },
            Clause::Never => false,
        }
    }
}

/// A rendered selector: `WHERE` fragment plus its bound parameters
///
/// Every `:name` placeholder in `where_sql` has exactly one entry in
/// `params`, and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Boolean expression suitable for a `WHERE` clause
    pub where_sql: String,
    /// Named parameters referenced by `where_sql`
    pub params: BTreeMap<String, Value>,
}

/// An ordered, AND-combined set of filter clauses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    clauses: Vec<Clause>,
}

impl Selector {
    /// Create an empty selector (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// The clauses in insertion order
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True when no clause has been added
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Does the record satisfy every clause?
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }

    /// Render to a parameter-bound `WHERE` fragment
    ///
    /// An empty selector renders to `1 = 1` and [`Clause::Never`] to `1 = 0`,
    /// so the result is always a valid boolean expression.
    pub fn to_sql(&self) -> SqlQuery {
        let mut namer = ParamNamer::default();
        let mut params = BTreeMap::new();
        let mut fragments = Vec::with_capacity(self.clauses.len());

        for clause in &self.clauses {
            fragments.push(render_clause(clause, &mut namer, &mut params));
        }

        let where_sql = if fragments.is_empty() {
            "1 = 1".to_string()
        } else {
            fragments.join(" AND ")
        };

        SqlQuery { where_sql, params }
    }
}

/// Generates collision-free parameter names
///
/// The first parameter for a base name gets the bare name, later ones get a
/// numeric suffix (`origin`, `origin1`, `origin2`, ...).
#[derive(Debug, Default)]
struct ParamNamer {
    counts: BTreeMap<&'static str, usize>,
}

impl ParamNamer {
    fn next(&mut self, base: &'static str) -> String {
        let count = self.counts.entry(base).or_insert(0);
        let name = if *count == 0 {
            base.to_string()
        } else {
            format!("{}{}", base, count)
        };
        *count += 1;
        name
    }
}

fn bind(
    base: &'static str,
    value: Value,
    namer: &mut ParamNamer,
    params: &mut BTreeMap<String, Value>,
) -> String {
    let name = namer.next(base);
    params.insert(name.clone(), value);
    name
}

fn render_clause(
    clause: &Clause,
    namer: &mut ParamNamer,
    params: &mut BTreeMap<String, Value>,
) -> String {
    match clause {
        Clause::Eq(field, value) => {
            let name = bind(field.column(), value.clone(), namer, params);
            format!("{} = :{}", field, name)
        }
        Clause::In(field, values) => {
            if values.is_empty() {
                return render_clause(&Clause::Never, namer, params);
            }
            let names: Vec<String> = values
                .iter()
                .map(|v| format!(":{}", bind(field.column(), v.clone(), namer, params)))
                .collect();
            format!("{} IN ({})", field, names.join(", "))
        }
        Clause::NotIn(field, values) => {
            if values.is_empty() {
                return "1 = 1".to_string();
            }
            let names: Vec<String> = values
                .iter()
                .map(|v| format!(":{}", bind(field.column(), v.clone(), namer, params)))
                .collect();
            format!("{} NOT IN ({})", field, names.join(", "))
        }
        Clause::AnyOf(field, values) => {
            if values.is_empty() {
                return render_clause(&Clause::Never, namer, params);
            }
            let parts: Vec<String> = values
                .iter()
                .map(|v| {
                    let name = bind(field.column(), v.clone(), namer, params);
                    format!("{} = :{}", field, name)
                })
                .collect();
            format!("({})", parts.join(" OR "))
        }
        Clause::TimeBetween { after, before } => {
            let date = bind("date", Value::Int(*after), namer, params);
            let enddate = bind("enddate", Value::Int(*before), namer, params);
            format!("(timecreated > :{} AND timecreated < :{})", date, enddate)
        }
        Clause::Contains(field, needle) => {
            let pattern = format!("%{}%", escape_like(needle));
            let name = bind(field.column(), Value::Text(pattern), namer, params);
            format!("{} LIKE :{}", field, name)
        }
        Clause::Never => "1 = 0".to_string(),
    }
}

/// Escape LIKE pattern metacharacters in user text
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
