// src/retrieval.rs
use std::thread;
use std::time::Duration;

use crate::config::RetryOptions;
use crate::page::PageClient;

/// Bounded retry around `PageClient::navigate`.
///
/// Callers only learn whether the page is loaded; the reason for each failed
/// attempt goes to the log, tagged with url and attempt index.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts: attempts.max(1), delay }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns `false` only once every attempt has failed.
    pub fn load<P: PageClient + ?Sized>(&self, page: &mut P, url: &str) -> bool {
        for attempt in 1..=self.attempts {
            match page.navigate(url) {
                Ok(()) => {
                    if attempt > 1 {
                        logf!("{} loaded on attempt {}", url, attempt);
                    }
                    return true;
                }
                Err(e) => {
                    logw!("attempt {}/{} failed for {}: {}", attempt, self.attempts, url, e);
                    if attempt < self.attempts && !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                }
            }
        }
        loge!("{} unreachable after {} attempts", url, self.attempts);
        false
    }
}

impl From<&RetryOptions> for RetryPolicy {
    fn from(o: &RetryOptions) -> Self {
        Self::new(o.attempts, o.delay)
    }
}
