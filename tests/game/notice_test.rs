// Notice Queue Tests
// One notice at a time, drained on a fixed cadence

use dicemesh::game::{NoticeConfig, NoticeQueue, NoticeTick};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_empty_queue_ticks_quietly() {
    let mut queue = NoticeQueue::default();
    assert_eq!(queue.tick(Instant::now()), NoticeTick::Unchanged);
    assert_eq!(queue.current(), None);
}

#[test]
fn test_single_notice_lingers_then_dismisses() {
    let mut queue = NoticeQueue::default();
    let start = Instant::now();
    queue.push("hello");

    assert_eq!(queue.tick(start), NoticeTick::Shown("hello".to_string()));
    assert_eq!(queue.tick(start + ms(1000)), NoticeTick::Unchanged);
    assert_eq!(queue.current(), Some("hello"));
    assert_eq!(queue.tick(start + ms(2000)), NoticeTick::Dismissed);
    assert_eq!(queue.current(), None);
    assert_eq!(queue.tick(start + ms(2100)), NoticeTick::Unchanged);
}

#[test]
fn test_burst_drains_quickly() {
    let mut queue = NoticeQueue::default();
    let start = Instant::now();
    queue.push("one");
    queue.push("two");
    queue.push("three");

    assert_eq!(queue.tick(start), NoticeTick::Shown("one".to_string()));
    assert_eq!(queue.tick(start + ms(50)), NoticeTick::Unchanged);
    assert_eq!(queue.tick(start + ms(100)), NoticeTick::Shown("two".to_string()));
    assert_eq!(queue.tick(start + ms(200)), NoticeTick::Shown("three".to_string()));
    // Last one gets the full display time
    assert_eq!(queue.tick(start + ms(300)), NoticeTick::Unchanged);
    assert_eq!(queue.tick(start + ms(2200)), NoticeTick::Dismissed);
}

#[test]
fn test_new_notice_cuts_display_short() {
    let mut queue = NoticeQueue::default();
    let start = Instant::now();
    queue.push("first");
    queue.tick(start);

    queue.push("second");
    assert_eq!(queue.tick(start + ms(100)), NoticeTick::Shown("second".to_string()));
}

#[test]
fn test_pending_is_bounded() {
    let config = NoticeConfig {
        max_pending: 2,
        ..NoticeConfig::default()
    };
    let mut queue = NoticeQueue::new(config);
    queue.push("a");
    queue.push("b");
    queue.push("c");

    assert_eq!(queue.pending(), 2);
    assert_eq!(queue.tick(Instant::now()), NoticeTick::Shown("b".to_string()));
}
