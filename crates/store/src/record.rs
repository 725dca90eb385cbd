//! Log event record model
//!
//! A [`LogRecord`] is one row of the standard log table. Records are immutable
//! once stored; the builder methods exist for constructing fixtures and for
//! backends that assemble records from raw rows.

use serde::{Deserialize, Serialize};

use crate::selector::{Field, Value};

/// A single log event record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Row id
    pub id: i64,
    /// Fully qualified event name (e.g. `\core\event\course_viewed`)
    pub eventname: String,
    /// Component that raised the event (e.g. `mod_quiz`)
    pub component: String,
    /// Event action verb (e.g. `viewed`, `error`)
    pub action: String,
    /// Event target (e.g. `course`)
    pub target: String,
    /// CRUD classification letter: `c`, `r`, `u` or `d`
    pub crud: String,
    /// Education level: 0 = other, 1 = teaching, 2 = participating
    pub edulevel: u8,
    /// Context level of the event (50 = course, 70 = module)
    pub contextlevel: i64,
    /// Instance id within the context level
    pub contextinstanceid: i64,
    /// Course the event belongs to
    pub courseid: i64,
    /// User who triggered the event
    pub userid: i64,
    /// Whether the event was logged anonymously
    pub anonymous: bool,
    /// Request origin: `web`, `cli`, `ws`, `restore` or other
    pub origin: String,
    /// Client IP, when recorded
    pub ip: Option<String>,
    /// Event time as epoch seconds
    pub timecreated: i64,
}

impl LogRecord {
    /// Create a record with the fields every event carries
    pub fn new(id: i64, eventname: impl Into<String>, timecreated: i64) -> Self {
        Self {
            id,
            eventname: eventname.into(),
            action: "viewed".into(),
            crud: "r".into(),
            origin: "web".into(),
            timecreated,
            ..Default::default()
        }
    }

    /// Set the course id
    pub fn with_course(mut self, courseid: i64) -> Self {
        self.courseid = courseid;
        self
    }

    /// Set the user id
    pub fn with_user(mut self, userid: i64) -> Self {
        self.userid = userid;
        self
    }

    /// Set the action verb
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the CRUD letter
    pub fn with_crud(mut self, crud: impl Into<String>) -> Self {
        self.crud = crud.into();
        self
    }

    /// Set the education level
    pub fn with_edulevel(mut self, edulevel: u8) -> Self {
        self.edulevel = edulevel;
        self
    }

    /// Place the event in a module context
    pub fn with_module_context(mut self, contextinstanceid: i64) -> Self {
        self.contextlevel = crate::selector::CONTEXT_MODULE;
        self.contextinstanceid = contextinstanceid;
        self
    }

    /// Set the origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Mark the event as anonymous
    pub fn with_anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Read the value of a selector field from this record
    pub fn value(&self, field: Field) -> Value {
        match field {
            Field::Id => Value::Int(self.id),
            Field::EventName => Value::Text(self.eventname.clone()),
            Field::Component => Value::Text(self.component.clone()),
            Field::Action => Value::Text(self.action.clone()),
            Field::Target => Value::Text(self.target.clone()),
            Field::Crud => Value::Text(self.crud.clone()),
            Field::EduLevel => Value::Int(self.edulevel as i64),
            Field::ContextLevel => Value::Int(self.contextlevel),
            Field::ContextInstanceId => Value::Int(self.contextinstanceid),
            Field::CourseId => Value::Int(self.courseid),
            Field::UserId => Value::Int(self.userid),
            Field::Anonymous => Value::Int(self.anonymous as i64),
            Field::Origin => Value::Text(self.origin.clone()),
            Field::TimeCreated => Value::Int(self.timecreated),
        }
    }
}
