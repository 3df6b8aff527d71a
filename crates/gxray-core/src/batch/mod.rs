//! JSON batch envelopes (`/$batch`): decomposition and request/response pairing.
//!
//! A batch envelope carries `{"requests": [...]}` in its request body and
//! `{"responses": [...]}` in its response body. Sub-item ids are unique within
//! one envelope only. Anything that does not have the expected shape is
//! treated as "not a batch" rather than an error.

mod correlate;
mod decompose;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::capture::Transaction;

pub use correlate::{correlate, BatchPair};
pub use decompose::decompose;

/// Path segment that marks a batch envelope.
pub const BATCH_SEGMENT: &str = "/$batch";

/// One entry of the envelope's `requests` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRequest {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub method: String,
    /// Relative to the envelope's base URL, e.g. `/me`.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Remaining fields (`headers`, `dependsOn`, ...) kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubRequest {
    /// Body as compact JSON text, empty when absent.
    pub fn body_text(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }

    /// Absolute URL of this sub-request within the envelope at `base`.
    pub fn absolute_url(&self, base: &str) -> String {
        if self.url.starts_with('/') || self.url.is_empty() {
            format!("{base}{}", self.url)
        } else {
            format!("{base}/{}", self.url)
        }
    }
}

/// One entry of the envelope's `responses` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ids are strings in practice; some clients send numbers.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "batch id must be a string or number, got {other}"
        ))),
    }
}

#[derive(Deserialize)]
struct RequestsEnvelope {
    requests: Vec<SubRequest>,
}

#[derive(Deserialize)]
struct ResponsesEnvelope {
    responses: Vec<SubResponse>,
}

pub(crate) fn parse_requests(body: Option<&str>) -> Option<Vec<SubRequest>> {
    let body = body.filter(|b| !b.trim().is_empty())?;
    serde_json::from_str::<RequestsEnvelope>(body)
        .ok()
        .map(|e| e.requests)
}

pub(crate) fn parse_responses(body: Option<&str>) -> Option<Vec<SubResponse>> {
    let body = body.filter(|b| !b.trim().is_empty())?;
    serde_json::from_str::<ResponsesEnvelope>(body)
        .ok()
        .map(|e| e.responses)
}

/// True iff the URL contains the batch segment.
pub fn is_batch_envelope(transaction: &Transaction) -> bool {
    transaction.url.contains(BATCH_SEGMENT)
}

/// Envelope URL with the batch segment (and everything after it) removed.
pub fn base_url(url: &str) -> &str {
    url.split_once(BATCH_SEGMENT).map_or(url, |(base, _)| base)
}

/// Shape of a transaction with respect to batching.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchShape {
    NotBatch,
    Batch {
        requests: Vec<SubRequest>,
        /// Empty when the response body is absent or malformed.
        responses: Vec<SubResponse>,
    },
}

impl BatchShape {
    /// Classifies `transaction`. A batch URL whose request body lacks a
    /// well-formed `requests` array is `NotBatch`.
    pub fn of(transaction: &Transaction) -> Self {
        if !is_batch_envelope(transaction) {
            return BatchShape::NotBatch;
        }
        let Some(requests) = parse_requests(transaction.request_body.as_deref()) else {
            return BatchShape::NotBatch;
        };
        let response_text = transaction.response_text();
        let responses = parse_responses(Some(&response_text)).unwrap_or_default();
        BatchShape::Batch {
            requests,
            responses,
        }
    }

    /// Correlated pairs, in request order. Empty for `NotBatch`.
    pub fn into_pairs(self) -> Vec<BatchPair> {
        match self {
            BatchShape::NotBatch => Vec::new(),
            BatchShape::Batch {
                requests,
                responses,
            } => correlate::pair(requests, responses),
        }
    }
}
