//! Minimal HTTP/1.1 server for download integration tests.
//!
//! Serves a fixed route table. Routes can answer with a status, an optional
//! `Content-Disposition`, a redirect, or stall forever after the headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Route {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
    /// Send headers, then never send the body.
    pub stall: bool,
}

impl Route {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            ..Self::default()
        }
    }

    pub fn attachment(name: &str, body: &[u8]) -> Self {
        Self {
            content_disposition: Some(format!("attachment; filename=\"{name}\"")),
            ..Self::ok(body)
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            location: Some(to.to_string()),
            content_disposition: Some("attachment; filename=\"hop.html\"".to_string()),
            ..Self::default()
        }
    }

    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::ok(&[0u8; 1024])
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a trailing
/// slash (e.g. "http://127.0.0.1:12345"). Unknown paths get 404.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        _ => "Status",
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path_only = target.split('?').next().unwrap_or(target);

    let not_found = Route {
        status: 404,
        body: b"not found".to_vec(),
        ..Route::default()
    };
    let route = routes
        .get(target)
        .or_else(|| routes.get(path_only))
        .unwrap_or(&not_found);

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    if let Some(cd) = &route.content_disposition {
        head.push_str(&format!("Content-Disposition: {cd}\r\n"));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {loc}\r\n"));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    if route.stall {
        thread::sleep(Duration::from_secs(60));
        return;
    }
    let _ = stream.write_all(&route.body);
}
