//! Minimal HTTP/1.1 snippet service for integration tests.
//!
//! Accepts POSTs, records what it received and answers with
//! `snippet: <first line of the body>`. A body containing `FAIL` gets
//! `500 Internal Server Error` instead.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request target, e.g. `/api/snippets?lang=go&generation=openapi`.
    pub target: String,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct SnippetServer {
    /// Endpoint URL without query, e.g. `http://127.0.0.1:12345/api/snippets`.
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start() -> SnippetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &log));
        }
    });
    SnippetServer {
        endpoint: format!("http://127.0.0.1:{port}/api/snippets"),
        requests,
    }
}

fn handle(mut stream: TcpStream, log: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(recorded) = read_request(&mut stream) else {
        return;
    };

    let (status, reply) = if recorded.body.contains("FAIL") {
        ("500 Internal Server Error", "Unsupported request".to_string())
    } else {
        let first = recorded.body.lines().next().unwrap_or_default();
        ("200 OK", format!("snippet: {first}"))
    };
    log.lock().unwrap().push(recorded);

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let target = lines.next()?.split(' ').nth(1)?.to_string();
    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().ok()?;
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let end = data.len().min(header_end + content_length);
    Some(Recorded {
        target,
        content_type,
        body: String::from_utf8_lossy(&data[header_end..end]).into_owned(),
    })
}
