// tests/retrieval.rs
mod common;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use common::FakePage;
use ub_airlog::page::Session;
use ub_airlog::retrieval::RetryPolicy;

const URL: &str = "https://weather.test/";

#[test]
fn recovers_within_budget() {
    let mut page = FakePage::new().page(URL, &[]).flaky(URL, 2);
    assert!(RetryPolicy::new(3, Duration::ZERO).load(&mut page, URL));
    assert_eq!(page.navigations.len(), 3);
}

#[test]
fn gives_up_after_budget() {
    let mut page = FakePage::new().page(URL, &[]).flaky(URL, 5);
    assert!(!RetryPolicy::new(3, Duration::ZERO).load(&mut page, URL));
    assert_eq!(page.navigations.len(), 3);
}

#[test]
fn first_success_stops_retrying() {
    let mut page = FakePage::new().page(URL, &[]);
    assert!(RetryPolicy::new(3, Duration::ZERO).load(&mut page, URL));
    assert_eq!(page.navigations, vec![URL.to_string()]);
}

#[test]
fn zero_attempts_still_tries_once() {
    let policy = RetryPolicy::new(0, Duration::ZERO);
    assert_eq!(policy.attempts(), 1);

    let mut page = FakePage::new();
    assert!(!policy.load(&mut page, URL));
    assert_eq!(page.navigations.len(), 1);
}

#[test]
fn session_closes_client_on_drop() {
    let closed = Rc::new(Cell::new(false));
    {
        let mut fake = FakePage::new().page(URL, &[]);
        fake.closed = closed.clone();
        let mut session = Session::new(fake);
        assert!(RetryPolicy::new(1, Duration::ZERO).load(&mut *session, URL));
        assert!(!closed.get());
    }
    assert!(closed.get());
}
