//! Rate-limit wait computation from upstream error bodies.

use std::time::Duration;

use crate::config::RetryConfig;

/// Extract the suggested wait from a 429 error body.
///
/// Looks for a phrase of the form `try again in <number>s`, case-insensitive,
/// with the number immediately before the `s`. The phrase is a best-effort
/// hint: anything absent or unparsable yields `None` and the caller falls
/// back to the configured default.
pub fn parse_retry_hint(body: &str) -> Option<f64> {
    let lower = body.to_ascii_lowercase();
    let start = lower.find("try again in ")? + "try again in ".len();
    let tail = &lower[start..];

    let end = tail
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(tail.len());
    let (number, rest) = tail.split_at(end);
    if !rest.starts_with('s') {
        return None;
    }
    number.parse().ok()
}

/// Compute the wait before the next attempt.
///
/// Hinted (or default) wait plus a fixed safety buffer, capped so a hostile
/// or confused hint cannot stall the request indefinitely.
pub fn retry_delay(hint: Option<f64>, retry: &RetryConfig) -> Duration {
    let base = hint.unwrap_or(retry.default_delay_secs);
    let capped = (base + retry.delay_buffer_secs).min(retry.max_delay_secs);
    Duration::from_secs_f64(capped.max(0.0))
}
