//! Filter a capture down to the relevant transactions, ordered by start time.

use crate::domains::{self, Mode};

use super::{Capture, Transaction, PREFLIGHT_METHOD};

/// Returns the relevant transactions of `capture` under `mode`.
///
/// Drops entries with an empty URL, pre-flight `OPTIONS` requests, and URLs no
/// enabled domain matches. The result is stably sorted by start time; entries
/// without a usable timestamp sort first and keep their recorded order.
pub fn normalize(capture: &Capture, mode: Mode) -> Vec<Transaction> {
    let mut relevant: Vec<Transaction> = capture
        .transactions
        .iter()
        .filter(|t| !t.url.is_empty())
        .filter(|t| !t.method.eq_ignore_ascii_case(PREFLIGHT_METHOD))
        .filter(|t| domains::is_relevant(&t.url, mode))
        .cloned()
        .collect();
    // sort_by_key is stable: ties keep capture order.
    relevant.sort_by_key(|t| t.started_at);
    tracing::debug!(
        %mode,
        total = capture.transactions.len(),
        relevant = relevant.len(),
        "normalized capture"
    );
    relevant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::parse_capture;

    fn capture(entries: &str) -> Capture {
        parse_capture(format!(r#"{{"log":{{"entries":[{entries}]}}}}"#).as_bytes()).unwrap()
    }

    fn entry(method: &str, url: &str, started: &str) -> String {
        format!(
            r#"{{"startedDateTime":"{started}","request":{{"method":"{method}","url":"{url}"}},"response":{{"status":200}}}}"#
        )
    }

    #[test]
    fn standard_and_extended_selection() {
        let c = capture(&[
            entry("GET", "https://graph.microsoft.com/v1.0/me", "2024-01-01T00:00:01Z"),
            entry("OPTIONS", "https://graph.microsoft.com/v1.0/me", "2024-01-01T00:00:00Z"),
            entry("GET", "https://admin.microsoft.com/x", "2024-01-01T00:00:02Z"),
        ]
        .join(","));

        let standard = normalize(&c, Mode::Standard);
        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].url, "https://graph.microsoft.com/v1.0/me");
        assert_eq!(standard[0].method, "GET");

        let extended = normalize(&c, Mode::Extended);
        let urls: Vec<_> = extended.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://graph.microsoft.com/v1.0/me", "https://admin.microsoft.com/x"]
        );
    }

    #[test]
    fn sorted_by_timestamp_with_stable_ties() {
        let c = capture(&[
            entry("GET", "https://graph.microsoft.com/v1.0/c", "2024-01-01T00:00:05Z"),
            entry("GET", "https://graph.microsoft.com/v1.0/a", "2024-01-01T00:00:01Z"),
            entry("POST", "https://graph.microsoft.com/v1.0/b1", "2024-01-01T00:00:03Z"),
            entry("PATCH", "https://graph.microsoft.com/v1.0/b2", "2024-01-01T01:00:03+01:00"),
        ]
        .join(","));
        let out = normalize(&c, Mode::Standard);
        let urls: Vec<_> = out.iter().map(|t| t.url.rsplit('/').next().unwrap()).collect();
        assert_eq!(urls, ["a", "b1", "b2", "c"]);
        assert!(out.windows(2).all(|w| w[0].started_at <= w[1].started_at));
    }

    #[test]
    fn excludes_empty_urls_and_unknown_hosts() {
        let c = capture(&[
            entry("GET", "", "2024-01-01T00:00:00Z"),
            entry("GET", "https://example.com/v1.0/me", "2024-01-01T00:00:00Z"),
            entry("options", "https://graph.microsoft.com/v1.0/me", "2024-01-01T00:00:00Z"),
        ]
        .join(","));
        assert!(normalize(&c, Mode::Extended).is_empty());
    }

    #[test]
    fn missing_timestamps_sort_first() {
        let c = capture(&[
            entry("GET", "https://graph.microsoft.com/v1.0/late", "2024-01-01T00:00:09Z"),
            entry("GET", "https://graph.microsoft.com/v1.0/undated", "yesterday"),
        ]
        .join(","));
        let out = normalize(&c, Mode::Standard);
        assert!(out[0].url.ends_with("undated"));
        assert!(out[1].url.ends_with("late"));
    }
}
