//! Build the HTTP message the snippet service translates.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::domains;
use crate::language::{EndpointVariant, SnippetLanguage};

/// Characters escaped in a request target: everything except letters, digits
/// and `;,/?:@&=+$-_.!~*'()#`, matching what browsers leave alone in a URI.
const URI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Content type declared for every translated request.
pub const WIRE_CONTENT_TYPE: &str = "application/json";

/// A ready-to-post request for the snippet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    /// Service URL including the language query parameters.
    pub endpoint: String,
    /// Literal HTTP/1.1 request line, headers, blank line and body.
    pub payload: String,
}

/// Service URL for `language`, derived from the bare `base` endpoint.
pub fn select_endpoint(base: &str, language: SnippetLanguage) -> String {
    match language.endpoint_variant() {
        EndpointVariant::Default => base.to_string(),
        EndpointVariant::LanguageTagged => format!("{base}?lang={}", language.key()),
        EndpointVariant::LanguageTaggedOpenApi => {
            format!("{base}?lang={}&generation=openapi", language.key())
        }
    }
}

/// Builds the request for one transaction.
///
/// `Host` comes from the domain registry split; the path is percent-encoded;
/// the body is copied verbatim (empty if absent).
pub fn build_wire_request(
    endpoint_base: &str,
    method: &str,
    url: &str,
    body: Option<&str>,
    language: SnippetLanguage,
) -> WireRequest {
    let (host, path) = domains::split_host_and_path(url);
    let path = encode_path(path);
    let payload = format!(
        "{method} {path} HTTP/1.1\r\nHost: {host}\r\nContent-Type: {WIRE_CONTENT_TYPE}\r\n\r\n{}",
        body.unwrap_or("")
    );
    WireRequest {
        endpoint: select_endpoint(endpoint_base, language),
        payload,
    }
}

/// Percent-encodes a path (with query) without otherwise touching it: dot
/// segments stay, reserved characters stay, and existing `%XX` escapes are
/// kept. A bare `%` is escaped.
fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(pos) = rest.find('%') {
        let (head, tail) = rest.split_at(pos);
        out.extend(utf8_percent_encode(head, URI_ESCAPE));
        let escape = tail
            .get(..3)
            .filter(|e| e.bytes().skip(1).all(|b| b.is_ascii_hexdigit()));
        match escape {
            Some(escape) => {
                out.push_str(escape);
                rest = &tail[3..];
            }
            None => {
                out.push_str("%25");
                rest = &tail[1..];
            }
        }
    }
    out.extend(utf8_percent_encode(rest, URI_ESCAPE));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://snippets.example.net/api/snippets";

    #[test]
    fn endpoint_variants() {
        assert_eq!(select_endpoint(BASE, SnippetLanguage::CSharp), BASE);
        assert_eq!(
            select_endpoint(BASE, SnippetLanguage::JavaScript),
            format!("{BASE}?lang=javascript")
        );
        assert_eq!(
            select_endpoint(BASE, SnippetLanguage::PowerShell),
            format!("{BASE}?lang=powershell&generation=openapi")
        );
    }

    #[test]
    fn payload_layout() {
        let wire = build_wire_request(
            BASE,
            "POST",
            "https://graph.microsoft.com/v1.0/users",
            Some(r#"{"displayName":"A"}"#),
            SnippetLanguage::Python,
        );
        assert_eq!(
            wire.payload,
            "POST /v1.0/users HTTP/1.1\r\nHost: graph.microsoft.com\r\nContent-Type: application/json\r\n\r\n{\"displayName\":\"A\"}"
        );
        assert_eq!(wire.endpoint, format!("{BASE}?lang=python&generation=openapi"));
    }

    #[test]
    fn path_is_percent_encoded() {
        let wire = build_wire_request(
            BASE,
            "GET",
            "https://graph.microsoft.com/v1.0/users?$filter=displayName eq 'Zoë'",
            None,
            SnippetLanguage::CSharp,
        );
        let line = wire.payload.lines().next().unwrap();
        assert!(line.starts_with("GET /v1.0/users?$filter=displayName%20eq%20"));
        assert_eq!(line.matches(' ').count(), 2);
        assert!(line.ends_with(" HTTP/1.1"));
        assert!(wire.payload.ends_with("\r\n\r\n"));
    }

    #[test]
    fn path_is_sent_as_captured() {
        let wire = build_wire_request(
            BASE,
            "GET",
            "https://graph.microsoft.com/v1.0/users/../me/./drive?$filter=name eq 'x'",
            None,
            SnippetLanguage::PowerShell,
        );
        assert!(wire.payload.starts_with(
            "GET /v1.0/users/../me/./drive?$filter=name%20eq%20'x' HTTP/1.1\r\n"
        ));
    }

    #[test]
    fn non_ascii_and_bare_percent_are_escaped() {
        let wire = build_wire_request(
            BASE,
            "GET",
            "https://graph.microsoft.com/v1.0/users?$search=\"Zoë 100%\"&x=a%2Fb",
            None,
            SnippetLanguage::Go,
        );
        assert!(wire.payload.starts_with(
            "GET /v1.0/users?$search=%22Zo%C3%AB%20100%25%22&x=a%2Fb HTTP/1.1\r\n"
        ));
    }

    #[test]
    fn existing_escapes_are_kept() {
        let wire = build_wire_request(
            BASE,
            "GET",
            "https://graph.microsoft.com/v1.0/users/a%40b.com",
            None,
            SnippetLanguage::Go,
        );
        assert!(wire.payload.starts_with("GET /v1.0/users/a%40b.com HTTP/1.1\r\n"));
    }

    #[test]
    fn unknown_host_uses_fallback() {
        let wire = build_wire_request(
            BASE,
            "GET",
            "https://example.com/x",
            None,
            SnippetLanguage::Java,
        );
        assert!(wire
            .payload
            .starts_with("GET https://example.com/x HTTP/1.1\r\nHost: graph.microsoft.com\r\n"));
    }
}
