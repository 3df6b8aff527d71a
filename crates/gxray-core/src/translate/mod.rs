//! Transaction-to-request translation and the remote snippet call.
//!
//! Filtering ("show me this call") and translation ("generate code for this
//! call") are separate policies: extended-tier domains can be listed but are
//! never sent to the snippet service, which does not support them.

mod transport;
mod wire;

use std::sync::Arc;

use crate::domains;
use crate::error::FetchError;
use crate::language::SnippetLanguage;

pub use transport::{CurlOptions, CurlTransport, SnippetTransport, SERVICE_CONTENT_TYPE};
pub use wire::{build_wire_request, select_endpoint, WireRequest, WIRE_CONTENT_TYPE};

/// Public snippet service endpoint.
pub const DEFAULT_SNIPPET_ENDPOINT: &str =
    "https://devxapi-func-prod-eastus.azurewebsites.net/api/graphexplorersnippets";

/// Why a transaction was not sent for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL belongs to an extended-tier domain.
    ExtendedDomain,
}

/// Result of asking for one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetOutcome {
    Generated(String),
    Skipped(SkipReason),
    Failed(FetchError),
}

impl SnippetOutcome {
    /// Snippet text, if one was generated and is non-empty.
    pub fn code(&self) -> Option<&str> {
        match self {
            SnippetOutcome::Generated(code) if !code.is_empty() => Some(code),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SnippetOutcome::Failed(_))
    }
}

/// True unless the URL belongs to an extended-tier domain.
pub fn eligible(url: &str) -> bool {
    !domains::is_extended_only(url)
}

/// Turns transactions into snippet service calls.
#[derive(Clone)]
pub struct Translator {
    endpoint: String,
    transport: Arc<dyn SnippetTransport>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn SnippetTransport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    /// Translator against `endpoint` using libcurl.
    pub fn with_curl(endpoint: impl Into<String>, opts: CurlOptions) -> Self {
        Self::new(endpoint, Arc::new(CurlTransport::new(opts)))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests a snippet for one call. Blocks on the network.
    ///
    /// Never fails: ineligible URLs are skipped, transport errors and non-2xx
    /// answers become [`SnippetOutcome::Failed`] and are logged.
    pub fn fetch_snippet(
        &self,
        language: SnippetLanguage,
        method: &str,
        url: &str,
        body: Option<&str>,
    ) -> SnippetOutcome {
        if !eligible(url) {
            tracing::debug!(method, url, "extended-tier domain, snippet skipped");
            return SnippetOutcome::Skipped(SkipReason::ExtendedDomain);
        }

        let wire = build_wire_request(&self.endpoint, method, url, body, language);
        match self.transport.post(&wire.endpoint, &wire.payload) {
            Ok(code) => {
                tracing::debug!(method, url, %language, bytes = code.len(), "snippet generated");
                SnippetOutcome::Generated(code)
            }
            Err(err) => {
                match &err {
                    FetchError::Status { status, body } => tracing::warn!(
                        method,
                        url,
                        status,
                        body = %body,
                        "snippet service returned an error"
                    ),
                    other => tracing::warn!(method, url, error = %other, "snippet request failed"),
                }
                SnippetOutcome::Failed(err)
            }
        }
    }
}
