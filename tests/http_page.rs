// tests/http_page.rs
//
// HttpPage against a throwaway local HTTP server that counts requests.
//
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use ub_airlog::config::Settings;
use ub_airlog::core::HttpPage;
use ub_airlog::page::{Locator, PageClient, PageError};

const BODY: &str = "<html><body><p class=\"v\">34 µg/m³</p></body></html>";

/// Serve `BODY` for every request; returns base URL and request counter.
fn serve() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                BODY.len(),
                BODY
            );
        }
    });

    (url, hits)
}

fn client() -> HttpPage {
    let mut settings = Settings::default();
    settings.poll = Duration::from_millis(50);
    HttpPage::new(&settings).unwrap()
}

#[test]
fn loaded_text_resolves_without_refetch() {
    let (url, hits) = serve();
    let mut page = client();

    page.navigate(&url).unwrap();
    let text = page.wait_for_text(&Locator::Css("p.v"), Duration::from_secs(2)).unwrap();

    assert_eq!(text, "34 µg/m³");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(page.page_source().unwrap().contains("class=\"v\""));
}

#[test]
fn missing_element_backs_off_then_settles() {
    let (url, hits) = serve();
    let mut page = client();
    page.navigate(&url).unwrap();

    // 50 + 100 + 200 + 400 ms fits a 1 s budget with the rest capped: at most 5 re-fetches.
    let err = page.wait_for_text(&Locator::Css("#absent"), Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, PageError::Timeout { .. }));
    let after_first = hits.load(Ordering::SeqCst);
    assert!(after_first > 1, "waiting should re-fetch");
    assert!(after_first <= 1 + 5, "re-fetched {} times", after_first - 1);

    // The page is settled now: the next miss answers at once, without a request.
    let started = Instant::now();
    let err = page.wait_for_text(&Locator::Css("#also-absent"), Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, PageError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(hits.load(Ordering::SeqCst), after_first);

    // Settled pages still answer locators that resolve.
    assert_eq!(page.wait_for_text(&Locator::Css("p.v"), Duration::from_secs(1)).unwrap(), "34 µg/m³");

    // A new navigation starts unsettled again.
    page.navigate(&url).unwrap();
    let before = hits.load(Ordering::SeqCst);
    let _ = page.wait_for_text(&Locator::Css("#absent"), Duration::from_millis(200));
    assert!(hits.load(Ordering::SeqCst) > before);
}

#[test]
fn no_page_and_closed_page() {
    let (url, _) = serve();
    let mut page = client();
    assert!(matches!(page.wait_for_text(&Locator::Css("p"), Duration::ZERO), Err(PageError::NoPage)));

    page.navigate(&url).unwrap();
    page.close();
    assert!(page.page_source().is_none());
}

#[test]
fn http_errors_are_navigation_failures() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let _ = write!(stream, "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    });

    let mut page = client();
    assert!(matches!(page.navigate(&url), Err(PageError::Navigation { .. })));
}
