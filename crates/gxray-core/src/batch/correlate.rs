//! Pair batch sub-requests with their sub-responses by id.

use std::collections::HashMap;

use super::{parse_requests, parse_responses, SubRequest, SubResponse};

/// A sub-request and, if the response array had one, its same-id response.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPair {
    pub id: String,
    pub request: SubRequest,
    pub response: Option<SubResponse>,
}

/// Pairs every entry of the `requests` array with the `responses` entry of the
/// same id.
///
/// Output follows request order. A malformed or absent response body gives an
/// empty lookup, so every pair has `response: None`. A malformed request body
/// gives no pairs.
pub fn correlate(request_body: Option<&str>, response_body: Option<&str>) -> Vec<BatchPair> {
    let Some(requests) = parse_requests(request_body) else {
        return Vec::new();
    };
    pair(requests, parse_responses(response_body).unwrap_or_default())
}

pub(crate) fn pair(requests: Vec<SubRequest>, responses: Vec<SubResponse>) -> Vec<BatchPair> {
    let lookup: HashMap<String, SubResponse> = responses
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();
    requests
        .into_iter()
        .map(|request| BatchPair {
            id: request.id.clone(),
            response: lookup.get(&request.id).cloned(),
            request,
        })
        .collect()
}
