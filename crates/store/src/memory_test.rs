//! Tests for the in-memory backend

use chrono::{Duration, Utc};

use crate::grain::TimeGrain;
use crate::memory::MemoryStore;
use crate::reader::{EventReader, OrderBy, Page, StoreCapabilities};
use crate::record::LogRecord;
use crate::selector::{Clause, Field, Selector};

fn course_fixture() -> MemoryStore {
    MemoryStore::standard(vec![
        LogRecord::new(1, "a", 100).with_course(5).with_user(1),
        LogRecord::new(2, "b", 300).with_course(5).with_user(2),
        LogRecord::new(3, "c", 200).with_course(5).with_user(3),
        LogRecord::new(4, "d", 400).with_course(9).with_user(1),
    ])
}

#[test]
fn test_count_events() {
    let store = course_fixture();
    let mut selector = Selector::new();
    selector.push(Clause::eq(Field::CourseId, 5));

    assert_eq!(store.count_events(&selector).unwrap(), 3);
    assert_eq!(store.count_events(&Selector::new()).unwrap(), 4);
}

#[test]
fn test_events_ordered_ascending() {
    let store = course_fixture();
    let mut selector = Selector::new();
    selector.push(Clause::eq(Field::CourseId, 5));

    let rows = store
        .events(&selector, &OrderBy::default(), Page::all())
        .unwrap();
    let times: Vec<i64> = rows.iter().map(|r| r.timecreated).collect();
    assert_eq!(times, vec![100, 200, 300]);
}

#[test]
fn test_events_ordered_descending() {
    let store = course_fixture();

    let rows = store
        .events(
            &Selector::new(),
            &OrderBy::desc(Field::TimeCreated),
            Page::all(),
        )
        .unwrap();
    let times: Vec<i64> = rows.iter().map(|r| r.timecreated).collect();
    assert_eq!(times, vec![400, 300, 200, 100]);
}

#[test]
fn test_events_paged_window() {
    let store = course_fixture();

    let rows = store
        .events(&Selector::new(), &OrderBy::default(), Page::at(1, 2))
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2]);

    // Window past the end is empty, not an error
    let rows = store
        .events(&Selector::new(), &OrderBy::default(), Page::at(10, 5))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_capabilities() {
    assert_eq!(
        course_fixture().capabilities(),
        StoreCapabilities::standard()
    );
    assert_eq!(
        MemoryStore::legacy(Vec::new()).capabilities(),
        StoreCapabilities::legacy()
    );
}

#[test]
fn test_hit_counts_window_and_distinct_users() {
    let now = Utc::now();
    // Anchor events inside hour buckets so boundary drift cannot move them
    let hour = TimeGrain::Hourly.truncate(now).timestamp();

    let store = MemoryStore::standard(vec![
        // Two users in the current hour: one bucket, two distinct
        LogRecord::new(1, "a", hour + 600).with_user(1),
        LogRecord::new(2, "b", hour + 700).with_user(2),
        LogRecord::new(3, "c", hour + 800).with_user(1), // same user again
        // Three hours earlier
        LogRecord::new(4, "d", hour - 3 * 3600 + 600).with_user(1),
        // Outside the 24h window: must not appear
        LogRecord::new(5, "e", (now - Duration::hours(30)).timestamp()).with_user(9),
    ]);

    let since = now - Duration::days(1);
    let hits = store.hit_counts(TimeGrain::Hourly, since).unwrap();

    assert_eq!(hits.len(), 2);
    // Ascending by bucket time
    assert!(hits[0].bucket < hits[1].bucket);
    // Older bucket has one user, recent bucket two distinct users
    assert_eq!(hits[0].users, 1);
    assert_eq!(hits[1].users, 2);
}

#[test]
fn test_hit_counts_daily_groups_by_calendar_day() {
    let now = Utc::now();
    let day = TimeGrain::Daily
        .truncate(now - Duration::days(2))
        .timestamp();

    let store = MemoryStore::standard(vec![
        LogRecord::new(1, "a", day + 3600).with_user(1),
        LogRecord::new(2, "b", day + 7200).with_user(2),
        LogRecord::new(3, "c", (now - Duration::days(40)).timestamp()).with_user(3),
    ]);

    let hits = store
        .hit_counts(TimeGrain::Daily, now - Duration::days(30))
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].users, 2);
    assert!(!hits[0].label.is_empty());
}

#[test]
fn test_hit_counts_empty_store() {
    let store = MemoryStore::standard(Vec::new());
    let hits = store
        .hit_counts(TimeGrain::Monthly, Utc::now() - Duration::days(365))
        .unwrap();
    assert!(hits.is_empty());
}
