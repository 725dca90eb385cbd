//! Tests for selector rendering and evaluation

use std::collections::BTreeSet;

use crate::record::LogRecord;
use crate::selector::{Clause, Field, Selector, SqlQuery, Value};

/// Every `:name` in the fragment must map to exactly one parameter
fn assert_params_bijective(query: &SqlQuery) {
    let mut referenced = BTreeSet::new();
    let bytes = query.where_sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            referenced.insert(query.where_sql[start..end].to_string());
            i = end;
        } else {
            i += 1;
        }
    }

    let declared: BTreeSet<String> = query.params.keys().cloned().collect();
    assert_eq!(referenced, declared, "fragment: {}", query.where_sql);
}

#[test]
fn test_empty_selector_matches_everything() {
    let selector = Selector::new();
    let query = selector.to_sql();

    assert_eq!(query.where_sql, "1 = 1");
    assert!(query.params.is_empty());
    assert!(selector.matches(&LogRecord::new(1, "x", 0)));
}

#[test]
fn test_never_matches_nothing() {
    let mut selector = Selector::new();
    selector.push(Clause::Never);

    assert_eq!(selector.to_sql().where_sql, "1 = 0");
    assert!(!selector.matches(&LogRecord::new(1, "x", 0)));
}

#[test]
fn test_eq_clause() {
    let mut selector = Selector::new();
    selector.push(Clause::eq(Field::CourseId, 5));

    let query = selector.to_sql();
    assert_eq!(query.where_sql, "courseid = :courseid");
    assert_eq!(query.params.get("courseid"), Some(&Value::Int(5)));
    assert_params_bijective(&query);

    assert!(selector.matches(&LogRecord::new(1, "x", 0).with_course(5)));
    assert!(!selector.matches(&LogRecord::new(1, "x", 0).with_course(6)));
}

#[test]
fn test_in_clause() {
    let mut selector = Selector::new();
    selector.push(Clause::In(
        Field::EduLevel,
        vec![Value::Int(0), Value::Int(1), Value::Int(2)],
    ));

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "edulevel IN (:edulevel, :edulevel1, :edulevel2)"
    );
    assert_params_bijective(&query);

    assert!(selector.matches(&LogRecord::new(1, "x", 0).with_edulevel(2)));
    assert!(!selector.matches(&LogRecord::new(1, "x", 0).with_edulevel(3)));
}

#[test]
fn test_empty_in_is_never() {
    let mut selector = Selector::new();
    selector.push(Clause::In(Field::UserId, Vec::new()));

    assert_eq!(selector.to_sql().where_sql, "1 = 0");
    assert!(!selector.matches(&LogRecord::new(1, "x", 0)));
}

#[test]
fn test_not_in_clause() {
    let mut selector = Selector::new();
    selector.push(Clause::NotIn(
        Field::Origin,
        vec!["cli".into(), "restore".into(), "ws".into(), "web".into()],
    ));

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "origin NOT IN (:origin, :origin1, :origin2, :origin3)"
    );
    assert_params_bijective(&query);

    assert!(!selector.matches(&LogRecord::new(1, "x", 0).with_origin("web")));
    assert!(!selector.matches(&LogRecord::new(1, "x", 0).with_origin("cli")));
    assert!(selector.matches(&LogRecord::new(1, "x", 0).with_origin("shell")));
}

#[test]
fn test_any_of_renders_or_chain() {
    let mut selector = Selector::new();
    selector.push(Clause::AnyOf(
        Field::Action,
        vec!["error".into(), "infected".into(), "failed".into()],
    ));

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "(action = :action OR action = :action1 OR action = :action2)"
    );
    assert_params_bijective(&query);

    assert!(selector.matches(&LogRecord::new(1, "x", 0).with_action("infected")));
    assert!(!selector.matches(&LogRecord::new(1, "x", 0).with_action("viewed")));
}

#[test]
fn test_time_between_exclusive() {
    let mut selector = Selector::new();
    selector.push(Clause::TimeBetween {
        after: 100,
        before: 200,
    });

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "(timecreated > :date AND timecreated < :enddate)"
    );
    assert_eq!(query.params.get("date"), Some(&Value::Int(100)));
    assert_eq!(query.params.get("enddate"), Some(&Value::Int(200)));
    assert_params_bijective(&query);

    assert!(!selector.matches(&LogRecord::new(1, "x", 100)));
    assert!(selector.matches(&LogRecord::new(1, "x", 101)));
    assert!(selector.matches(&LogRecord::new(1, "x", 199)));
    assert!(!selector.matches(&LogRecord::new(1, "x", 200)));
}

#[test]
fn test_contains_is_parameter_bound() {
    let mut selector = Selector::new();
    selector.push(Clause::Contains(
        Field::EventName,
        "'; DROP TABLE x; --".to_string(),
    ));

    let query = selector.to_sql();
    // The needle never appears in the fragment, only in the bound parameter.
    assert_eq!(query.where_sql, "eventname LIKE :eventname");
    assert!(!query.where_sql.contains("DROP"));
    assert_eq!(
        query.params.get("eventname"),
        Some(&Value::Text("%'; DROP TABLE x; --%".to_string()))
    );
    assert_params_bijective(&query);
}

#[test]
fn test_contains_escapes_like_metacharacters() {
    let mut selector = Selector::new();
    selector.push(Clause::Contains(Field::EventName, "100%_done".to_string()));

    let query = selector.to_sql();
    assert_eq!(
        query.params.get("eventname"),
        Some(&Value::Text("%100\\%\\_done%".to_string()))
    );
}

#[test]
fn test_contains_matches_substring() {
    let mut selector = Selector::new();
    selector.push(Clause::Contains(Field::EventName, "course_viewed".to_string()));

    assert!(selector.matches(&LogRecord::new(1, "\\core\\event\\course_viewed", 0)));
    assert!(!selector.matches(&LogRecord::new(1, "\\core\\event\\user_loggedin", 0)));
}

#[test]
fn test_repeated_fields_get_unique_names() {
    let mut selector = Selector::new();
    selector.push(Clause::eq(Field::Origin, "web"));
    selector.push(Clause::In(Field::Origin, vec!["cli".into(), "ws".into()]));

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "origin = :origin AND origin IN (:origin1, :origin2)"
    );
    assert_eq!(query.params.len(), 3);
    assert_params_bijective(&query);
}

#[test]
fn test_multi_clause_selector() {
    let mut selector = Selector::new();
    selector.push(Clause::eq(Field::CourseId, 5));
    selector.push(Clause::eq(Field::UserId, 7));
    selector.push(Clause::TimeBetween {
        after: 1000,
        before: 87400,
    });
    selector.push(Clause::eq(Field::Anonymous, 0));

    let query = selector.to_sql();
    assert_eq!(
        query.where_sql,
        "courseid = :courseid AND userid = :userid AND \
         (timecreated > :date AND timecreated < :enddate) AND anonymous = :anonymous"
    );
    assert_params_bijective(&query);

    let hit = LogRecord::new(1, "x", 2000).with_course(5).with_user(7);
    let anon = hit.clone().with_anonymous(true);
    assert!(selector.matches(&hit));
    assert!(!selector.matches(&anon));
}
