// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for WAPI calls.
//!
//! Transient failures (HTTP 429, 5xx gateway errors, connection failures,
//! timeouts) are retried with exponential backoff; permanent errors fail
//! immediately. Only `GET` and `DELETE` are retried; see
//! [`is_replayable_method`].

use rand::Rng;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::wapi_errors::WapiError;

/// HTTP retry initial interval (50ms)
const HTTP_INITIAL_INTERVAL_MILLIS: u64 = 50;

/// HTTP retry maximum interval (10 seconds)
const HTTP_MAX_INTERVAL_SECS: u64 = 10;

/// HTTP retry maximum elapsed time (2 minutes)
const HTTP_MAX_ELAPSED_TIME_SECS: u64 = 120;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Jitter applied to each interval (±10%)
const JITTER: f64 = 0.1;

/// Exponential backoff with jitter, bounded by an overall deadline.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    next_interval: Duration,
    max_interval: Duration,
    deadline: Option<Instant>,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a backoff starting at `initial_interval`.
    ///
    /// `jitter` is the relative spread applied to each interval (0.1 means
    /// ±10%). The deadline starts counting now.
    #[must_use]
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_elapsed_time: Option<Duration>,
        multiplier: f64,
        jitter: f64,
    ) -> Self {
        Self {
            next_interval: initial_interval.min(max_interval),
            max_interval,
            deadline: max_elapsed_time.map(|limit| Instant::now() + limit),
            multiplier,
            jitter,
        }
    }

    /// Next wait, or `None` once the deadline has passed.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return None;
        }

        let interval = self.next_interval;
        self.next_interval = interval.mul_f64(self.multiplier).min(self.max_interval);

        if self.jitter == 0.0 {
            return Some(interval);
        }
        let spread = 1.0 + rand::rng().random_range(-self.jitter..=self.jitter);
        Some(interval.mul_f64(spread.max(0.0)))
    }
}

/// Create exponential backoff configuration for WAPI retries.
///
/// # Configuration
///
/// - **Initial interval**: 50ms
/// - **Max interval**: 10 seconds
/// - **Max elapsed time**: 2 minutes total
/// - **Multiplier**: 2.0 (exponential growth)
/// - **Jitter**: ±10%
#[must_use]
pub fn http_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(HTTP_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(HTTP_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(HTTP_MAX_ELAPSED_TIME_SECS)),
        BACKOFF_MULTIPLIER,
        JITTER,
    )
}

/// Whether a request with this method may be sent again after a transient
/// failure.
///
/// `GET` has no side effects. A replayed `DELETE` either removes the object or
/// finds it already gone (404), which callers deleting by alias treat as done.
/// `POST` and `PUT` are never replayed: a replayed create turns into a
/// duplicate conflict, and a rename issues a new `_ref`, so replaying the
/// `PUT` against the old one reports 404 for an update that was applied.
#[must_use]
pub fn is_replayable_method(method: &reqwest::Method) -> bool {
    matches!(*method, reqwest::Method::GET | reqwest::Method::DELETE)
}

/// Run `operation` until it succeeds, fails permanently, or the backoff
/// window closes.
///
/// # Errors
///
/// Returns the first non-retryable error unchanged, or
/// [`WapiError::RetriesExhausted`] wrapping the last transient error.
pub async fn retry_wapi_call<T, F, Fut>(
    mut backoff: ExponentialBackoff,
    operation_name: &str,
    mut operation: F,
) -> Result<T, WapiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, WapiError>>,
{
    let start_time = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "WAPI call succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %e,
                        "Retryable WAPI error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                } else {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Backoff exhausted, giving up"
                    );
                    return Err(WapiError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
