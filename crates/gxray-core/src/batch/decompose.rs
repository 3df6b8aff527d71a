//! Split a batch request body into its sub-requests.

use super::{parse_requests, SubRequest};

/// Sub-requests of a batch request body, in array order.
///
/// Returns an empty list when the body is absent, is not JSON, or has no
/// well-formed `requests` array.
pub fn decompose(request_body: Option<&str>) -> Vec<SubRequest> {
    parse_requests(request_body).unwrap_or_default()
}
