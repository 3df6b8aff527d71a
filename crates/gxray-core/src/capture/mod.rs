//! HAR (HTTP Archive) capture: parse, validate and normalize into transactions.
//!
//! The container is checked structurally (`log.entries` must be an array) and
//! rejected before any filtering if that fails. Entries are read field by
//! field: a mistyped field is simply absent, and a non-object entry becomes a
//! transaction with an empty URL, which normalization then drops.

mod normalize;
mod parse;

use base64::Engine;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::path::Path;

use crate::error::CaptureError;

pub use normalize::normalize;

/// HTTP method that is never relevant (CORS pre-flight).
pub const PREFLIGHT_METHOD: &str = "OPTIONS";

/// Recorded response content, possibly base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub text: String,
    pub encoding: Option<String>,
}

impl ResponseBody {
    /// Decoded text. Base64 content that fails to decode is returned verbatim.
    pub fn decoded(&self) -> String {
        if !self
            .encoding
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case("base64"))
        {
            return self.text.clone();
        }
        match base64::engine::general_purpose::STANDARD.decode(self.text.trim()) {
            Ok(bytes) => String::from_utf8(bytes)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            Err(_) => self.text.clone(),
        }
    }
}

/// One recorded HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    pub method: String,
    pub url: String,
    pub request_body: Option<String>,
    pub response_status: u16,
    pub response_body: Option<ResponseBody>,
    /// `startedDateTime`; `None` when missing or not RFC 3339.
    pub started_at: Option<DateTime<FixedOffset>>,
}

impl Transaction {
    /// Request line shown to the user, e.g. `GET https://graph.microsoft.com/v1.0/me`.
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Request body text, empty if absent.
    pub fn request_text(&self) -> &str {
        self.request_body.as_deref().unwrap_or("")
    }

    /// Decoded response body text, empty if absent.
    pub fn response_text(&self) -> String {
        self.response_body
            .as_ref()
            .map(ResponseBody::decoded)
            .unwrap_or_default()
    }

    /// Reads one HAR entry field by field. A non-object entry yields `None`.
    fn from_entry(entry: &Value) -> Option<Self> {
        if !entry.is_object() {
            return None;
        }
        let response_body = parse::str_at(entry, "/response/content/text")
            .filter(|t| !t.is_empty())
            .map(|text| ResponseBody {
                text: text.to_string(),
                encoding: parse::text_at(entry, "/response/content/encoding"),
            });
        Some(Self {
            method: parse::text_at(entry, "/request/method").unwrap_or_default(),
            url: parse::text_at(entry, "/request/url").unwrap_or_default(),
            request_body: parse::text_at(entry, "/request/postData/text"),
            response_status: parse::status_at(entry, "/response/status").unwrap_or(0),
            response_body,
            started_at: parse::str_at(entry, "/startedDateTime").and_then(parse::timestamp),
        })
    }
}

/// A parsed capture: metadata plus transactions in recorded order.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub creator: Option<String>,
    pub version: Option<String>,
    pub transactions: Vec<Transaction>,
}

/// Structural check: an object with a `log` object holding an `entries` array.
pub fn validate(raw: &Value) -> bool {
    raw.get("log")
        .filter(|log| log.is_object())
        .and_then(|log| log.get("entries"))
        .is_some_and(Value::is_array)
}

/// Parses capture bytes, rejecting containers without `log.entries`.
pub fn parse_capture(bytes: &[u8]) -> Result<Capture, CaptureError> {
    let mut raw: Value = serde_json::from_slice(bytes)?;
    if !validate(&raw) {
        return Err(CaptureError::MissingEntries);
    }
    let mut log = raw
        .get_mut("log")
        .map(Value::take)
        .ok_or(CaptureError::MissingEntries)?;

    let version = log.get("version").and_then(Value::as_str).map(String::from);
    let creator = match (
        parse::str_at(&log, "/creator/name"),
        parse::str_at(&log, "/creator/version"),
    ) {
        (Some(name), Some(v)) => Some(format!("{name} {v}")),
        (Some(name), None) => Some(name.to_string()),
        _ => None,
    };

    let entries = match log.get_mut("entries").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(CaptureError::MissingEntries),
    };
    let mut malformed = 0usize;
    let transactions = entries
        .iter()
        .map(|e| {
            Transaction::from_entry(e).unwrap_or_else(|| {
                malformed += 1;
                Transaction::default()
            })
        })
        .collect::<Vec<_>>();
    if malformed > 0 {
        tracing::debug!(malformed, "non-object HAR entries were ignored");
    }

    Ok(Capture {
        creator,
        version,
        transactions,
    })
}

/// Reads and parses a capture file.
pub fn read_capture(path: &Path) -> Result<Capture, CaptureError> {
    let bytes = std::fs::read(path).map_err(|source| CaptureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let capture = parse_capture(&bytes)?;
    tracing::info!(
        path = %path.display(),
        entries = capture.transactions.len(),
        "loaded HAR capture"
    );
    Ok(capture)
}
