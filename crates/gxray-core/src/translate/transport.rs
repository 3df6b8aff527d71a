//! Posting wire requests to the snippet service.
//!
//! Uses the curl crate (libcurl). Calls block the current thread; the
//! pipeline runs them through `spawn_blocking`.

use curl::easy::{Easy, List};
use std::time::Duration;

use crate::error::FetchError;

/// Header the snippet service requires on every request.
pub const SERVICE_CONTENT_TYPE: &str = "content-type: application/http";

/// Sends one translated request and returns the snippet text.
///
/// Implementations return `Err` for transport failures and non-2xx statuses.
pub trait SnippetTransport: Send + Sync {
    fn post(&self, endpoint: &str, payload: &str) -> Result<String, FetchError>;
}

/// Connect and total timeouts for the curl transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
        }
    }
}

/// libcurl-backed transport. One easy handle per request.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }
}

fn transport_error(e: curl::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

impl SnippetTransport for CurlTransport {
    fn post(&self, endpoint: &str, payload: &str) -> Result<String, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = Easy::new();
        easy.url(endpoint).map_err(transport_error)?;
        easy.post(true).map_err(transport_error)?;
        easy.post_fields_copy(payload.as_bytes())
            .map_err(transport_error)?;
        easy.follow_location(true).map_err(transport_error)?;
        easy.connect_timeout(self.opts.connect_timeout)
            .map_err(transport_error)?;
        easy.timeout(self.opts.timeout).map_err(transport_error)?;

        let mut list = List::new();
        list.append(SERVICE_CONTENT_TYPE).map_err(transport_error)?;
        // Suppress "Expect: 100-continue" on larger bodies.
        list.append("Expect:").map_err(transport_error)?;
        easy.http_headers(list).map_err(transport_error)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport_error)?;
            transfer.perform().map_err(transport_error)?;
        }

        let code = easy.response_code().map_err(transport_error)?;
        let text = String::from_utf8_lossy(&body).into_owned();
        if !(200..300).contains(&code) {
            return Err(FetchError::Status {
                status: code,
                body: text,
            });
        }
        Ok(text)
    }
}
