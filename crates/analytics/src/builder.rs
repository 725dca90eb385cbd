//! Filter-to-selector translation
//!
//! Turns a [`FilterOptions`] set into a parameter-bound [`Selector`] for
//! the log store. Clause order follows the report's historical layout;
//! order does not affect correctness, but keeping it stable makes the
//! rendered SQL predictable.

use logreport_store::{Clause, Field, Selector, StoreCapabilities, Value, CONTEXT_MODULE};

use crate::error::Result;
use crate::filter::{Action, EduLevel, FilterOptions, OriginFilter};
use crate::groups::GroupLookup;

/// Course id of the site course; a filter on it adds no predicate
pub const SITE_COURSE_ID: i64 = 1;

/// Seconds in the fixed one-day date window
pub const DAY_SECS: i64 = 86_400;

/// Actions that classify an event as a site error
const SITE_ERROR_ACTIONS: [&str; 3] = ["error", "infected", "failed"];

/// Build the event selector for a filter set
///
/// When the store has the composite (user, module, crud, edulevel) index
/// and both the user and module filters are set, crud and edulevel
/// predicates are forced even if the caller did not request them; the
/// index is only effective with those columns constrained.
pub fn build_selector(
    options: &FilterOptions,
    capabilities: StoreCapabilities,
    groups: &dyn GroupLookup,
) -> Result<Selector> {
    let extended_index = capabilities.extended_index
        && options.user_id.is_some()
        && options.module_id.is_some();

    let mut selector = Selector::new();

    if let Some(course_id) = options.course_id {
        if course_id != SITE_COURSE_ID {
            selector.push(Clause::eq(Field::CourseId, course_id));
        }
    }

    if options.site_errors {
        selector.push(Clause::AnyOf(
            Field::Action,
            SITE_ERROR_ACTIONS.iter().map(|a| (*a).into()).collect(),
        ));
    }

    if let Some(module_id) = options.module_id {
        selector.push(Clause::eq(Field::ContextLevel, CONTEXT_MODULE));
        selector.push(Clause::eq(Field::ContextInstanceId, module_id));
    }

    match options.action {
        Some(action) => selector.push(Clause::eq(Field::Crud, action.crud())),
        None if extended_index => selector.push(Clause::In(
            Field::Crud,
            Action::ALL_CRUD.iter().map(|c| (*c).into()).collect(),
        )),
        None => {}
    }

    if let (Some(group_id), None) = (options.group_id, options.user_id) {
        let members = groups.members_of(group_id)?;
        if members.is_empty() {
            // No users in the group: a predicate that is always false,
            // never an empty IN-list.
            selector.push(Clause::Never);
        } else {
            selector.push(Clause::In(
                Field::UserId,
                members.into_iter().map(Value::Int).collect(),
            ));
        }
    } else if let Some(user_id) = options.user_id {
        selector.push(Clause::eq(Field::UserId, user_id));
    }

    if let Some(date) = options.date {
        selector.push(Clause::TimeBetween {
            after: date,
            before: date + DAY_SECS,
        });
    }

    match options.edulevel {
        Some(edulevel) => selector.push(Clause::eq(Field::EduLevel, edulevel.level())),
        None if extended_index => selector.push(Clause::In(
            Field::EduLevel,
            EduLevel::ALL.iter().map(|l| Value::Int(l.level())).collect(),
        )),
        None => {}
    }

    match &options.origin {
        Some(OriginFilter::Exact(origin)) => {
            selector.push(Clause::eq(Field::Origin, origin.clone()));
        }
        Some(OriginFilter::Other) => {
            selector.push(Clause::NotIn(
                Field::Origin,
                OriginFilter::KNOWN.iter().map(|o| (*o).into()).collect(),
            ));
        }
        None => {}
    }

    // Legacy stores never record anonymous events, so the predicate would
    // be redundant there.
    if capabilities.supports_anonymous {
        selector.push(Clause::eq(Field::Anonymous, 0));
    }

    if let Some(search) = &options.search {
        if !search.is_empty() {
            selector.push(Clause::Contains(Field::EventName, search.clone()));
        }
    }

    Ok(selector)
}
